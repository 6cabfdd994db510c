//! Terminal call statuses.
//!
//! The terminal status is the transport/infrastructure disposition of a
//! call and is disjoint by type from the business errors carried inside
//! the result union. A non-`Ok` status never travels with a payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scalar::MalformedScalar;

/// Status codes for the terminal disposition of a call.
///
/// These codes are stable and used for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// The call reached the handler and its outcome is in the payload.
    Ok,
    /// The call was cancelled before completing.
    Cancelled,
    /// A required authentication header was missing or rejected.
    Unauthenticated,
    /// Malformed envelope, missing required fields, or invalid field values.
    InvalidRequest,
    /// A scalar wire tuple failed to decode (codec/schema mismatch).
    MalformedScalar,
    /// Unknown operation requested.
    UnknownOperation,
    /// Protocol version is outside the supported range.
    UnsupportedProtocol,
    /// An unexpected internal failure; never downgraded to a declared
    /// business variant.
    Internal,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::MalformedScalar => write!(f, "MALFORMED_SCALAR"),
            Self::UnknownOperation => write!(f, "UNKNOWN_OPERATION"),
            Self::UnsupportedProtocol => write!(f, "UNSUPPORTED_PROTOCOL"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Terminal status of a call: a code plus an optional single-line detail.
///
/// Details must not contain secrets or stack traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStatus {
    /// Status code from the registry.
    pub code: StatusCode,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CallStatus {
    /// The success status.
    pub fn ok() -> Self {
        Self {
            code: StatusCode::Ok,
            detail: None,
        }
    }

    /// Create a status with a detail message.
    pub fn new(code: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    /// A bare status with no detail.
    pub fn bare(code: StatusCode) -> Self {
        Self { code, detail: None }
    }

    /// True when the call completed and the payload is populated.
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }

    /// Create a CANCELLED status.
    pub fn cancelled() -> Self {
        Self::bare(StatusCode::Cancelled)
    }

    /// Create an UNAUTHENTICATED status.
    pub fn unauthenticated(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::Unauthenticated, detail)
    }

    /// Create an INVALID_REQUEST status.
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::InvalidRequest, detail)
    }

    /// Create an UNKNOWN_OPERATION status.
    pub fn unknown_operation(op: &str) -> Self {
        Self::new(StatusCode::UnknownOperation, format!("unknown operation: {}", op))
    }

    /// Create an UNSUPPORTED_PROTOCOL status.
    pub fn unsupported_protocol(version: i32, min: i32, max: i32) -> Self {
        Self::new(
            StatusCode::UnsupportedProtocol,
            format!(
                "protocol_version {} is outside supported range [{}, {}]",
                version, min, max
            ),
        )
    }

    /// Create an INTERNAL status.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::Internal, detail)
    }
}

impl From<MalformedScalar> for CallStatus {
    fn from(err: MalformedScalar) -> Self {
        Self::new(StatusCode::MalformedScalar, err.to_string())
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.code, detail),
            None => write!(f, "{}", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_screaming_snake_case() {
        let json = serde_json::to_value(StatusCode::UnsupportedProtocol).unwrap();
        assert_eq!(json, serde_json::json!("UNSUPPORTED_PROTOCOL"));
    }

    #[test]
    fn test_detail_omitted_when_absent() {
        let json = serde_json::to_string(&CallStatus::ok()).unwrap();
        assert!(!json.contains("detail"));
    }

    #[test]
    fn test_malformed_scalar_maps_to_status() {
        let status: CallStatus = MalformedScalar::ScaleOutOfRange(30).into();
        assert_eq!(status.code, StatusCode::MalformedScalar);
        assert!(status.detail.unwrap().contains("30"));
    }
}
