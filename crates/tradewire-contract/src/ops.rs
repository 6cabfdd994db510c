//! Operation-specific contract types.
//!
//! One module per declared remote operation, each pairing a request
//! message with a response message and a closed business-error
//! enumeration. These are the generated-style stubs both sides share;
//! scalar fields use the wire tuples from [`crate::scalar`].

pub mod cancel_order;
pub mod create_limit_order;
pub mod get_wallets;

pub use cancel_order::{CancelOrderError, CancelOrderRequest, CancelOrderResponse};
pub use create_limit_order::{
    CreateLimitOrderRequest, CreateLimitOrderResponse, OrderError, OrderSide,
};
pub use get_wallets::{GetWalletsRequest, GetWalletsResponse, Wallet, WalletError};

/// Known operation names.
pub mod names {
    pub const GET_WALLETS: &str = "get_wallets";
    pub const CREATE_LIMIT_ORDER: &str = "create_limit_order";
    pub const CANCEL_ORDER: &str = "cancel_order";
}
