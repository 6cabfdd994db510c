//! RPC request envelope.

use serde::{Deserialize, Serialize};

use crate::context::Metadata;

/// RPC request envelope.
///
/// The payload is the operation-specific request message; metadata is
/// the out-of-band header channel (authentication and the like).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version negotiated by the caller.
    pub protocol_version: i32,
    /// Operation name.
    pub op: String,
    /// Caller-chosen request ID for correlation.
    pub request_id: String,
    /// Call-scoped key/value metadata, ordered, case-sensitive.
    #[serde(default)]
    pub metadata: Vec<(String, String)>,
    /// Operation-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RpcRequest {
    /// Build the call's metadata view from the envelope entries.
    pub fn metadata(&self) -> Metadata {
        self.metadata.iter().cloned().collect()
    }
}
