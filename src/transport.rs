//! Transport layer for the RPC client.
//!
//! The real transport (connections, TLS, framing) is an external
//! collaborator; this module defines the seam and an in-process
//! implementation that hands requests straight to a server dispatcher,
//! used by the demo CLI and the test suite.

use std::io;

use tradewire_contract::{CallContext, CancelToken, RpcRequest, RpcResponse};
use tradewire_server::Dispatcher;

/// Transport trait for RPC communication.
pub trait Transport: Send + Sync {
    /// Execute an RPC request and return the response envelope.
    fn execute(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError>;
}

/// Transport errors: the infrastructure failure channel on the caller
/// side, disjoint from business errors by construction.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-process transport: dispatches against a server binding directly.
pub struct InProcessTransport {
    dispatcher: Dispatcher,
    cancel: CancelToken,
}

impl InProcessTransport {
    /// Wrap a dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            cancel: CancelToken::new(),
        }
    }

    /// The token that cancels calls in flight on this transport.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl Transport for InProcessTransport {
    fn execute(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let mut ctx = CallContext::with_cancel_token(request.metadata(), self.cancel.clone());
        Ok(self.dispatcher.dispatch(request, &mut ctx))
    }
}
