//! Order cancellation operation types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    /// Identifier returned by order placement.
    pub order_id: String,
}

/// Order cancellation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOrderResponse {
    /// The cancelled order's identifier (echoed).
    pub order_id: String,
}

/// Declared errors for order cancellation. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelOrderError {
    /// No open order with the given identifier.
    #[error("order not found")]
    OrderNotFound,
    /// The order has already been filled and cannot be cancelled.
    #[error("already filled")]
    AlreadyFilled,
}
