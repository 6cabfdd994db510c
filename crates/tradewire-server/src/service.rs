//! The handler contract: one method per declared remote operation.
//!
//! Implementations speak domain types only. They never see envelopes,
//! metadata, or wire tuples; the per-operation handlers in
//! [`crate::handlers`] do the scalar conversion at the boundary.

use tradewire_contract::ops::{CancelOrderError, OrderError, OrderSide, WalletError};
use tradewire_contract::{Decimal, Timestamp};

/// A wallet balance as the business logic sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSnapshot {
    pub asset: String,
    pub balance: Decimal,
    pub reserved: Decimal,
}

/// A limit order as submitted to the business logic.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrder {
    pub asset: String,
    pub side: OrderSide,
    pub price: Decimal,
    pub amount: Decimal,
}

/// Acknowledgement of an accepted order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAck {
    pub order_id: String,
    pub accepted_at: Timestamp,
}

/// Acknowledgement of a cancelled order.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelAck {
    pub order_id: String,
}

/// The service capability set bound to the contract.
///
/// Each method returns either a success value or a variant of that
/// operation's closed error enumeration; the dispatch shim encodes the
/// outcome into the result union uniformly.
pub trait ExchangeService: Send + Sync {
    /// List all wallet balances.
    fn wallets(&self) -> Result<Vec<WalletSnapshot>, WalletError>;

    /// Validate and accept a limit order, reserving balance for it.
    fn create_limit_order(&self, order: LimitOrder) -> Result<OrderAck, OrderError>;

    /// Cancel an open order and release its reservation.
    fn cancel_order(&self, order_id: &str) -> Result<CancelAck, CancelOrderError>;
}
