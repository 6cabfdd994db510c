//! Host RPC client.
//!
//! Wraps a [`Transport`] with the client-side interceptor chain, the
//! request envelope plumbing, and the inverse scalar codecs. Every typed
//! wrapper returns `Result<CallResult<_, _>, ClientError>`: transport
//! and terminal-status failures in the outer `Result`, business errors
//! inside the union where the discriminator check cannot be skipped.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use tradewire_contract::ops::{
    names, CancelOrderError, CancelOrderRequest, CancelOrderResponse, CreateLimitOrderRequest,
    CreateLimitOrderResponse, GetWalletsRequest, GetWalletsResponse, OrderError, OrderSide,
    WalletError,
};
use tradewire_contract::outcome::decode_result;
use tradewire_contract::{
    ApiKeyStamp, CallContext, CallOutcome, CallResult, CallStatus, Decimal, InterceptorChain,
    Metadata, MalformedScalar, RpcRequest, ScalarCodec, ScalarRegistry, StatusCode, Timestamp,
    PROTOCOL_MAX,
};

use crate::transport::{Transport, TransportError};

/// RPC client errors: everything except declared business errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The call ended with a non-OK terminal status.
    #[error("call failed: {0}")]
    Status(CallStatus),

    /// A response scalar failed to decode.
    #[error("malformed scalar in response: {0}")]
    Scalar(#[from] MalformedScalar),
}

impl ClientError {
    /// The terminal status code, when the failure carries one.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(status.code),
            _ => None,
        }
    }
}

/// A wallet balance decoded back to domain values.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletView {
    pub asset: String,
    pub balance: Decimal,
    pub reserved: Decimal,
}

/// An accepted order decoded back to domain values.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub accepted_at: Timestamp,
}

/// Host RPC client for one service binding.
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    chain: InterceptorChain,
    registry: ScalarRegistry,
    protocol_version: i32,
}

impl RpcClient {
    /// Client with an empty interceptor chain.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_chain(transport, InterceptorChain::new())
    }

    /// Client that stamps the given API key onto every call.
    pub fn with_api_key(transport: Arc<dyn Transport>, api_key: impl Into<String>) -> Self {
        let chain = InterceptorChain::builder()
            .stage(ApiKeyStamp::new(api_key))
            .build();
        Self::with_chain(transport, chain)
    }

    /// Client with a caller-declared interceptor chain.
    pub fn with_chain(transport: Arc<dyn Transport>, chain: InterceptorChain) -> Self {
        Self {
            transport,
            chain,
            registry: ScalarRegistry::standard(),
            protocol_version: PROTOCOL_MAX,
        }
    }

    /// List wallet balances.
    pub fn get_wallets(&self) -> Result<CallResult<Vec<WalletView>, WalletError>, ClientError> {
        let union: CallResult<GetWalletsResponse, WalletError> =
            self.call(names::GET_WALLETS, &GetWalletsRequest::default())?;
        match union {
            CallResult::Success(response) => {
                let mut views = Vec::with_capacity(response.wallets.len());
                for wallet in response.wallets {
                    views.push(WalletView {
                        asset: wallet.asset,
                        balance: self.registry.decimal().decode(wallet.balance)?,
                        reserved: self.registry.decimal().decode(wallet.reserved)?,
                    });
                }
                Ok(CallResult::Success(views))
            }
            CallResult::Failure(e) => Ok(CallResult::Failure(e)),
        }
    }

    /// Place a limit order.
    pub fn create_limit_order(
        &self,
        asset: &str,
        side: OrderSide,
        price: &Decimal,
        amount: &Decimal,
    ) -> Result<CallResult<OrderConfirmation, OrderError>, ClientError> {
        let request = CreateLimitOrderRequest {
            asset: asset.to_string(),
            side,
            price: self.registry.decimal().encode(price),
            amount: self.registry.decimal().encode(amount),
        };
        let union: CallResult<CreateLimitOrderResponse, OrderError> =
            self.call(names::CREATE_LIMIT_ORDER, &request)?;
        match union {
            CallResult::Success(response) => Ok(CallResult::Success(OrderConfirmation {
                order_id: response.order_id,
                accepted_at: self.registry.timestamp().decode(response.accepted_at)?,
            })),
            CallResult::Failure(e) => Ok(CallResult::Failure(e)),
        }
    }

    /// Cancel an open order.
    pub fn cancel_order(
        &self,
        order_id: &str,
    ) -> Result<CallResult<CancelOrderResponse, CancelOrderError>, ClientError> {
        self.call(
            names::CANCEL_ORDER,
            &CancelOrderRequest {
                order_id: order_id.to_string(),
            },
        )
    }

    /// Run one call through the client chain and the transport.
    fn call<Req, Resp, Err>(
        &self,
        op: &str,
        request: &Req,
    ) -> Result<CallResult<Resp, Err>, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
        Err: DeserializeOwned,
    {
        let payload = serde_json::to_value(request).map_err(TransportError::from)?;
        let request_id = Uuid::new_v4().to_string();

        let mut ctx = CallContext::with_metadata(Metadata::new());
        let mut transport_error: Option<TransportError> = None;

        let outcome = self.chain.run(&mut ctx, |ctx| {
            let envelope = RpcRequest {
                protocol_version: self.protocol_version,
                op: op.to_string(),
                request_id: request_id.clone(),
                metadata: ctx
                    .metadata()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                payload: payload.clone(),
            };
            match self.transport.execute(&envelope) {
                Ok(response) => match response.into_outcome() {
                    Ok(outcome) => outcome,
                    Err(status) => CallOutcome::rejected(status),
                },
                Err(e) => {
                    let status = CallStatus::internal(e.to_string());
                    transport_error = Some(e);
                    CallOutcome::rejected(status)
                }
            }
        });

        if let Some(e) = transport_error {
            return Err(e.into());
        }

        let (status, payload) = outcome.into_parts();
        match payload {
            Some(value) => decode_result(value).map_err(ClientError::Status),
            None => Err(ClientError::Status(status)),
        }
    }

    /// Protocol version stamped onto outgoing envelopes.
    pub fn protocol_version(&self) -> i32 {
        self.protocol_version
    }
}
