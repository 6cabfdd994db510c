//! Limit order placement handler.

use tradewire_contract::ops::{CreateLimitOrderRequest, CreateLimitOrderResponse, OrderError};
use tradewire_contract::outcome::encode_result;
use tradewire_contract::{CallOutcome, CallResult, CallStatus, ScalarCodec, ScalarRegistry};

use crate::service::{ExchangeService, LimitOrder};

/// Handle the create_limit_order operation.
pub fn handle(
    service: &dyn ExchangeService,
    registry: &ScalarRegistry,
    payload: serde_json::Value,
) -> CallOutcome {
    let req: CreateLimitOrderRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            return CallOutcome::rejected(CallStatus::invalid_request(format!(
                "invalid create_limit_order request: {}",
                e
            )))
        }
    };

    // Scalar decode failures are a codec/schema mismatch, reported on the
    // terminal channel rather than as a business error.
    let price = match registry.decimal().decode(req.price) {
        Ok(d) => d,
        Err(e) => return CallOutcome::rejected(e.into()),
    };
    let amount = match registry.decimal().decode(req.amount) {
        Ok(d) => d,
        Err(e) => return CallOutcome::rejected(e.into()),
    };

    let order = LimitOrder {
        asset: req.asset,
        side: req.side,
        price,
        amount,
    };

    let result: CallResult<CreateLimitOrderResponse, OrderError> =
        match service.create_limit_order(order) {
            Ok(ack) => CallResult::Success(CreateLimitOrderResponse {
                order_id: ack.order_id,
                accepted_at: registry.timestamp().encode(&ack.accepted_at),
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
    use tradewire_contract::ops::OrderSide;
    use tradewire_contract::{Decimal, DecimalCodec, StatusCode};

    fn wire(literal: &str) -> tradewire_contract::DecimalWire {
        DecimalCodec.encode(&literal.parse::<Decimal>().unwrap())
    }

    fn seeded() -> Ledger {
        let ledger = Ledger::new("USDT");
        ledger.credit(
            "BTC",
            "12.00".parse().unwrap(),
            "1.00".parse().unwrap(),
        );
        ledger
    }

    fn request(amount: &str) -> serde_json::Value {
        serde_json::to_value(CreateLimitOrderRequest {
            asset: "BTC".to_string(),
            side: OrderSide::Sell,
            price: wire("50000.00"),
            amount: wire(amount),
        })
        .unwrap()
    }

    #[test]
    fn test_accepted_order_returns_success_branch() {
        let outcome = handle(&seeded(), &ScalarRegistry::standard(), request("2.0"));
        assert!(outcome.is_ok());
        let payload = outcome.payload().unwrap();
        assert!(payload["result"]["order_id"].is_string());
        assert!(payload["result"]["accepted_at"]["ticks"].is_u64());
        assert!(payload.get("error").is_none());
    }

    #[test]
    fn test_insufficient_balance_returns_error_branch() {
        let outcome = handle(&seeded(), &ScalarRegistry::standard(), request("11.5"));
        // Business rejection still completes the call.
        assert!(outcome.is_ok());
        let payload = outcome.payload().unwrap();
        assert_eq!(payload["error"], "NOT_ENOUGH_BALANCE");
        assert!(payload.get("result").is_none());
    }

    #[test]
    fn test_malformed_scalar_is_terminal_not_business() {
        let mut payload = request("1.0");
        payload["price"]["sign_scale"] = serde_json::json!(40 << 16);
        let outcome = handle(&seeded(), &ScalarRegistry::standard(), payload);
        assert_eq!(outcome.status().code, StatusCode::MalformedScalar);
        assert!(outcome.payload().is_none());
    }

    #[test]
    fn test_missing_field_is_invalid_request() {
        let outcome = handle(
            &seeded(),
            &ScalarRegistry::standard(),
            serde_json::json!({ "asset": "BTC" }),
        );
        assert_eq!(outcome.status().code, StatusCode::InvalidRequest);
    }
}
