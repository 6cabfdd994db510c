//! Limit order placement operation types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scalar::{DecimalWire, TimestampWire};

/// Which side of the book the order joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Limit order placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLimitOrderRequest {
    /// Base asset symbol, e.g. "BTC".
    pub asset: String,
    /// Order side.
    pub side: OrderSide,
    /// Limit price in the quote asset.
    pub price: DecimalWire,
    /// Amount of the base asset.
    pub amount: DecimalWire,
}

/// Limit order placement response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLimitOrderResponse {
    /// Server-assigned order identifier.
    pub order_id: String,
    /// When the order was accepted into the book.
    pub accepted_at: TimestampWire,
}

/// Declared errors for limit order placement. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderError {
    /// Available balance cannot cover the order's reservation.
    #[error("not enough balance")]
    NotEnoughBalance,
    /// The asset is not traded on this venue.
    #[error("unknown asset")]
    UnknownAsset,
    /// Amount is zero, negative, or unrepresentable.
    #[error("invalid amount")]
    InvalidAmount,
    /// Price is zero, negative, or unrepresentable.
    #[error("invalid price")]
    InvalidPrice,
}
