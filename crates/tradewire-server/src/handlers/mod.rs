//! Per-operation handlers.
//!
//! Each handler decodes the request payload (including scalar wire
//! tuples), invokes the bound [`crate::service::ExchangeService`]
//! method, and encodes the outcome into the result union. Decode
//! failures surface as terminal statuses; business failures travel
//! inside the union.

pub mod cancel_order;
pub mod create_limit_order;
pub mod get_wallets;
