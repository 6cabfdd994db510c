//! The service dispatch shim.
//!
//! Binds one [`ExchangeService`] implementation to the contract: every
//! incoming call is validated, routed through the server interceptor
//! chain, dispatched to the matching handler, and assembled into a
//! response envelope. Handlers never see headers and never serialize by
//! hand; business errors always leave through the result union.

use std::sync::Arc;

use tradewire_contract::ops::names;
use tradewire_contract::{
    ApiKeyAuth, CallContext, CallOutcome, CallStatus, InterceptorChain, RpcRequest, RpcResponse,
    ScalarRegistry,
};

use crate::config::ServerConfig;
use crate::handlers;
use crate::service::ExchangeService;

/// Routes calls for one service binding.
pub struct Dispatcher {
    service: Arc<dyn ExchangeService>,
    chain: InterceptorChain,
    registry: ScalarRegistry,
    protocol_min: i32,
    protocol_max: i32,
}

impl Dispatcher {
    /// Bind a service with the configuration's standard chain.
    ///
    /// With `require_api_key` set, the chain is exactly one
    /// authentication stage; the chain is fixed here and identical for
    /// every call on this binding.
    pub fn new(service: Arc<dyn ExchangeService>, config: &ServerConfig) -> Self {
        let chain = if config.require_api_key {
            InterceptorChain::builder().stage(ApiKeyAuth).build()
        } else {
            InterceptorChain::new()
        };
        Self::with_chain(service, config, chain)
    }

    /// Bind a service with a caller-declared interceptor chain.
    pub fn with_chain(
        service: Arc<dyn ExchangeService>,
        config: &ServerConfig,
        chain: InterceptorChain,
    ) -> Self {
        Self {
            service,
            chain,
            registry: ScalarRegistry::standard(),
            protocol_min: config.protocol_min,
            protocol_max: config.protocol_max,
        }
    }

    /// Dispatch one call. The context is owned by this call; the
    /// transport layer wires its cancellation token before dispatching.
    pub fn dispatch(&self, request: &RpcRequest, ctx: &mut CallContext) -> RpcResponse {
        if request.protocol_version < self.protocol_min
            || request.protocol_version > self.protocol_max
        {
            let status = CallStatus::unsupported_protocol(
                request.protocol_version,
                self.protocol_min,
                self.protocol_max,
            );
            ctx.complete(status.clone());
            return RpcResponse::rejected(request.protocol_version, request.request_id.clone(), status);
        }

        let service = self.service.as_ref();
        let registry = &self.registry;
        let op = request.op.as_str();
        let payload = &request.payload;

        let outcome = self.chain.run(ctx, |_ctx| route(service, registry, op, payload.clone()));

        ctx.complete(outcome.status().clone());
        RpcResponse::from_outcome(request.protocol_version, request.request_id.clone(), outcome)
    }
}

/// Innermost chain step: the handler invocation for the named operation.
fn route(
    service: &dyn ExchangeService,
    registry: &ScalarRegistry,
    op: &str,
    payload: serde_json::Value,
) -> CallOutcome {
    match op {
        names::GET_WALLETS => handlers::get_wallets::handle(service, registry, payload),
        names::CREATE_LIMIT_ORDER => {
            handlers::create_limit_order::handle(service, registry, payload)
        }
        names::CANCEL_ORDER => handlers::cancel_order::handle(service, payload),
        _ => CallOutcome::rejected(CallStatus::unknown_operation(op)),
    }
}
