//! Tradewire Contract Types
//!
//! The shared contract layer for the tradewire RPC surface: operation
//! messages, scalar wire codecs, the discriminated result union, the
//! per-call context, and the interceptor chain. Pure types and pure
//! functions; the transport itself is an external collaborator.

pub mod context;
pub mod decimal;
pub mod intercept;
pub mod ops;
pub mod outcome;
pub mod request;
pub mod response;
pub mod scalar;
pub mod status;

pub use context::{CallContext, CancelToken, Metadata};
pub use decimal::{Decimal, DecimalError};
pub use intercept::{
    ApiKeyAuth, ApiKeyStamp, Interceptor, InterceptorChain, InterceptorChainBuilder, Next,
    API_KEY_HEADER,
};
pub use outcome::{CallOutcome, CallResult};
pub use request::RpcRequest;
pub use response::RpcResponse;
pub use scalar::{
    DecimalCodec, DecimalWire, MalformedScalar, ScalarCodec, ScalarRegistry, Timestamp,
    TimestampCodec, TimestampWire,
};
pub use status::{CallStatus, StatusCode};

/// Minimum protocol version supported by this implementation.
pub const PROTOCOL_MIN: i32 = 1;

/// Maximum protocol version supported by this implementation.
pub const PROTOCOL_MAX: i32 = 1;
