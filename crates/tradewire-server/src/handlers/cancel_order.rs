//! Order cancellation handler.

use tradewire_contract::ops::{CancelOrderError, CancelOrderRequest, CancelOrderResponse};
use tradewire_contract::outcome::encode_result;
use tradewire_contract::{CallOutcome, CallResult, CallStatus};

use crate::service::ExchangeService;

/// Handle the cancel_order operation.
pub fn handle(service: &dyn ExchangeService, payload: serde_json::Value) -> CallOutcome {
    let req: CancelOrderRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            return CallOutcome::rejected(CallStatus::invalid_request(format!(
                "invalid cancel_order request: {}",
                e
            )))
        }
    };

    let result: CallResult<CancelOrderResponse, CancelOrderError> =
        match service.cancel_order(&req.order_id) {
            Ok(ack) => CallResult::Success(CancelOrderResponse {
                order_id: ack.order_id,
            }),
            Err(e) => CallResult::Failure(e),
        };

    match encode_result(&result) {
        Ok(value) => CallOutcome::success(value),
        Err(status) => CallOutcome::rejected(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    #[test]
    fn test_unknown_order_is_a_business_error() {
        let ledger = Ledger::new("USDT");
        let outcome = handle(&ledger, serde_json::json!({ "order_id": "nope" }));
        assert!(outcome.is_ok());
        assert_eq!(outcome.payload().unwrap()["error"], "ORDER_NOT_FOUND");
    }
}
