//! Wallet listing operation types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scalar::DecimalWire;

/// Wallet listing request. No fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetWalletsRequest {}

/// Wallet listing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetWalletsResponse {
    /// One entry per asset the account holds.
    ///
    /// Always present at the container level: an absent tag decodes to
    /// an empty collection, and an empty collection still serializes.
    #[serde(default)]
    pub wallets: Vec<Wallet>,
}

/// A single asset balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Asset symbol, e.g. "BTC".
    pub asset: String,
    /// Total balance.
    pub balance: DecimalWire,
    /// Amount locked by open orders.
    pub reserved: DecimalWire,
}

/// Declared errors for wallet listing. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletError {
    /// The ledger backing the account is temporarily unavailable.
    #[error("ledger unavailable")]
    LedgerUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_wallets_tag_decodes_to_empty_collection() {
        let response: GetWalletsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.wallets.is_empty());
    }

    #[test]
    fn test_empty_wallets_still_serialize() {
        let json = serde_json::to_value(GetWalletsResponse { wallets: vec![] }).unwrap();
        assert_eq!(json, serde_json::json!({ "wallets": [] }));
    }
}
