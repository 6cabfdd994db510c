//! Call outcomes: the discriminated result union and the pipeline outcome.
//!
//! [`CallResult`] carries the business-level outcome of a completed call:
//! exactly one of a success payload or a declared error variant. It never
//! carries transport failures; those travel in the terminal status (see
//! [`crate::status`]). [`CallOutcome`] is what the interceptor chain and
//! dispatch shim pass around: a terminal status plus a payload that is
//! present if and only if the status is `Ok`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::status::CallStatus;

/// A call outcome holding exactly one of a success payload or a typed
/// business error.
///
/// Wire form is externally tagged: a JSON object with exactly one key,
/// `result` or `error`. The discriminator is which key is populated;
/// objects with zero or two keys fail to decode. There is no accessor
/// that yields the success payload without going through the
/// discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallResult<S, E> {
    /// The operation completed and produced a response.
    #[serde(rename = "result")]
    Success(S),
    /// The operation was rejected with a declared error variant.
    #[serde(rename = "error")]
    Failure(E),
}

impl<S, E> CallResult<S, E> {
    /// True when the success branch is populated.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True when the error branch is populated.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrow the success payload, if that branch is populated.
    pub fn success(&self) -> Option<&S> {
        match self {
            Self::Success(s) => Some(s),
            Self::Failure(_) => None,
        }
    }

    /// Borrow the error, if that branch is populated.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    /// Convert into a standard `Result`, forcing the caller to branch.
    pub fn into_result(self) -> Result<S, E> {
        match self {
            Self::Success(s) => Ok(s),
            Self::Failure(e) => Err(e),
        }
    }
}

impl<S, E> From<Result<S, E>> for CallResult<S, E> {
    fn from(result: Result<S, E>) -> Self {
        match result {
            Ok(s) => Self::Success(s),
            Err(e) => Self::Failure(e),
        }
    }
}

/// Encode a handler outcome as the union's wire value.
///
/// Serialization of contract types is infallible in practice; a failure
/// here indicates a contract bug and surfaces as an internal status.
pub fn encode_result<S, E>(result: &CallResult<S, E>) -> Result<serde_json::Value, CallStatus>
where
    S: Serialize,
    E: Serialize,
{
    serde_json::to_value(result)
        .map_err(|e| CallStatus::internal(format!("failed to encode result union: {}", e)))
}

/// Decode the union's wire value on the caller side.
pub fn decode_result<S, E>(value: serde_json::Value) -> Result<CallResult<S, E>, CallStatus>
where
    S: DeserializeOwned,
    E: DeserializeOwned,
{
    serde_json::from_value(value)
        .map_err(|e| CallStatus::internal(format!("failed to decode result union: {}", e)))
}

/// Terminal status plus optional payload, as threaded through the
/// interceptor chain.
///
/// The fields are private so the invariant holds by construction: the
/// payload is present if and only if the status is `Ok`. A rejected call
/// can never leak a default-initialized success payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    status: CallStatus,
    payload: Option<serde_json::Value>,
}

impl CallOutcome {
    /// A completed call: `Ok` status carrying the encoded result union.
    pub fn success(payload: serde_json::Value) -> Self {
        Self {
            status: CallStatus::ok(),
            payload: Some(payload),
        }
    }

    /// A terminated call: non-`Ok` status, no payload.
    ///
    /// An `Ok` status passed here is coerced to an internal error rather
    /// than fabricating an empty success.
    pub fn rejected(status: CallStatus) -> Self {
        let status = if status.is_ok() {
            CallStatus::internal("rejected outcome constructed with OK status")
        } else {
            status
        };
        Self {
            status,
            payload: None,
        }
    }

    /// The terminal status.
    pub fn status(&self) -> &CallStatus {
        &self.status
    }

    /// True when the call completed with a payload.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Borrow the payload (present iff the status is `Ok`).
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    /// Split into status and payload.
    pub fn into_parts(self) -> (CallStatus, Option<serde_json::Value>) {
        (self.status, self.payload)
    }
}
