//! RPC response envelope.

use serde::{Deserialize, Serialize};

use crate::outcome::CallOutcome;
use crate::status::CallStatus;

/// RPC response envelope.
///
/// `status` is the terminal disposition of the call; `payload` holds the
/// operation's encoded result union and is present if and only if the
/// status is `OK`. Business errors live inside the payload union, never
/// in the status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Protocol version (echoed from the request).
    pub protocol_version: i32,
    /// Request ID echoed from the request.
    pub request_id: String,
    /// Terminal status of the call.
    pub status: CallStatus,
    /// Encoded result union (present when status is OK).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Assemble a response from a pipeline outcome.
    pub fn from_outcome(protocol_version: i32, request_id: String, outcome: CallOutcome) -> Self {
        let (status, payload) = outcome.into_parts();
        Self {
            protocol_version,
            request_id,
            status,
            payload,
        }
    }

    /// A response for a call that never reached the pipeline.
    pub fn rejected(protocol_version: i32, request_id: String, status: CallStatus) -> Self {
        Self::from_outcome(protocol_version, request_id, CallOutcome::rejected(status))
    }

    /// Reconstruct the pipeline outcome on the caller side, enforcing
    /// the status/payload consistency invariant on decoded envelopes.
    pub fn into_outcome(self) -> Result<CallOutcome, CallStatus> {
        match (self.status.is_ok(), self.payload) {
            (true, Some(payload)) => Ok(CallOutcome::success(payload)),
            (true, None) => Err(CallStatus::internal("OK response with no payload")),
            (false, Some(_)) => Err(CallStatus::internal(format!(
                "{} response carries a payload",
                self.status.code
            ))),
            (false, None) => Ok(CallOutcome::rejected(self.status)),
        }
    }
}
