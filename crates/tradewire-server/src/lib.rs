//! Tradewire Server
//!
//! Server side of the tradewire contract: the handler contract
//! ([`service::ExchangeService`]), per-operation handlers, the dispatch
//! shim routing every call through the interceptor chain, an in-memory
//! ledger implementation, and the stdio RPC entry point.

pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod ledger;
pub mod rpc;
pub mod service;

pub use config::{ConfigError, ServerConfig};
pub use dispatcher::Dispatcher;
pub use ledger::Ledger;
pub use rpc::{serve, RpcHandler};
pub use service::{CancelAck, ExchangeService, LimitOrder, OrderAck, WalletSnapshot};
