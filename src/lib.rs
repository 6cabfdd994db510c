//! Tradewire - schema-first RPC contract layer
//!
//! Host/client side of the tradewire contract: the transport seam, an
//! in-process transport for demos and tests, and a typed RPC client
//! that runs the client interceptor chain and the inverse scalar
//! codecs. The contract itself lives in `tradewire-contract`; the
//! server side in `tradewire-server`.

pub mod client;
pub mod transport;

pub use client::{ClientError, OrderConfirmation, RpcClient, WalletView};
pub use transport::{InProcessTransport, Transport, TransportError};
