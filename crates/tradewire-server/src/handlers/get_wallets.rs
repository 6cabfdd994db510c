//! Wallet listing handler.

use tradewire_contract::ops::{GetWalletsRequest, GetWalletsResponse, Wallet, WalletError};
use tradewire_contract::outcome::encode_result;
use tradewire_contract::{CallOutcome, CallResult, CallStatus, ScalarCodec, ScalarRegistry};

use crate::service::ExchangeService;

/// Handle the get_wallets operation.
pub fn handle(
    service: &dyn ExchangeService,
    registry: &ScalarRegistry,
    payload: serde_json::Value,
) -> CallOutcome {
    let _req: GetWalletsRequest = match serde_json::from_value(normalize(payload)) {
        Ok(req) => req,
        Err(e) => {
            return CallOutcome::rejected(CallStatus::invalid_request(format!(
                "invalid get_wallets request: {}",
                e
            )))
        }
    };

    let result: CallResult<GetWalletsResponse, WalletError> = match service.wallets() {
        Ok(snapshots) => CallResult::Success(GetWalletsResponse {
            wallets: snapshots
                .into_iter()
                .map(|w| Wallet {
                    asset: w.asset,
                    balance: registry.decimal().encode(&w.balance),
                    reserved: registry.decimal().encode(&w.reserved),
                })
                .collect(),
        }),
        Err(e) => CallResult::Failure(e),
    };

    match encode_result(&result) {
        Ok(value) => CallOutcome::success(value),
        Err(status) => CallOutcome::rejected(status),
    }
}

/// A missing payload means an empty request message.
fn normalize(payload: serde_json::Value) -> serde_json::Value {
    if payload.is_null() {
        serde_json::json!({})
    } else {
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use tradewire_contract::Decimal;

    #[test]
    fn test_wallets_encode_through_decimal_codec() {
        let ledger = Ledger::new("USDT");
        ledger.credit(
            "BTC",
            "12.00".parse::<Decimal>().unwrap(),
            "1.00".parse::<Decimal>().unwrap(),
        );
        let registry = ScalarRegistry::standard();

        let outcome = handle(&ledger, &registry, serde_json::Value::Null);
        assert!(outcome.is_ok());
        let payload = outcome.payload().unwrap();
        let wallet = &payload["result"]["wallets"][0];
        assert_eq!(wallet["asset"], "BTC");
        assert_eq!(wallet["balance"]["lo"], 1200);
        assert_eq!(wallet["balance"]["sign_scale"], 0x0002_0000);
        assert_eq!(wallet["reserved"]["lo"], 100);
    }

    #[test]
    fn test_empty_ledger_yields_present_empty_collection() {
        let ledger = Ledger::new("USDT");
        let registry = ScalarRegistry::standard();

        let outcome = handle(&ledger, &registry, serde_json::json!({}));
        let payload = outcome.payload().unwrap();
        assert_eq!(payload["result"]["wallets"], serde_json::json!([]));
    }

    #[test]
    fn test_malformed_request_payload() {
        let ledger = Ledger::new("USDT");
        let registry = ScalarRegistry::standard();

        let outcome = handle(&ledger, &registry, serde_json::json!([1, 2, 3]));
        assert!(!outcome.is_ok());
        assert!(outcome.payload().is_none());
    }
}
