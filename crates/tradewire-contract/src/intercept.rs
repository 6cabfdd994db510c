//! Interceptor chain: ordered pre/post-call hooks around every call.
//!
//! A chain is built once per service binding; stage order is declared by
//! the caller and identical for every call on that binding. Each stage
//! may inspect or mutate the call's metadata, delegate to the rest of
//! the chain and post-process the outcome, or short-circuit with a
//! terminal status without delegating. The chain itself holds no mutable
//! state, so concurrent calls need no coordination.

use std::sync::Arc;

use crate::context::CallContext;
use crate::outcome::CallOutcome;
use crate::status::CallStatus;

/// Metadata key the authentication stage inspects.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The innermost step of a chain: the actual handler invocation.
pub type Handler<'a> = &'a mut dyn FnMut(&mut CallContext) -> CallOutcome;

/// A single, named pipeline stage.
pub trait Interceptor: Send + Sync {
    /// Stable stage name, used for ordering assertions and logs.
    fn name(&self) -> &str;

    /// Run this stage. `next` is the remainder of the chain ending in
    /// the handler; not calling it short-circuits the call.
    fn call(&self, ctx: &mut CallContext, next: Next<'_, '_>) -> CallOutcome;
}

/// The remainder of a chain, from the current stage to the handler.
pub struct Next<'a, 'h> {
    stages: &'a [Arc<dyn Interceptor>],
    handler: Handler<'h>,
}

impl Next<'_, '_> {
    /// Run the remaining stages and the handler.
    ///
    /// Checks the cancellation signal before every step: a cancelled
    /// context yields a `Cancelled` outcome without running anything
    /// further.
    pub fn run(self, ctx: &mut CallContext) -> CallOutcome {
        if ctx.is_cancelled() {
            return CallOutcome::rejected(CallStatus::cancelled());
        }
        match self.stages.split_first() {
            Some((stage, rest)) => stage.call(
                ctx,
                Next {
                    stages: rest,
                    handler: self.handler,
                },
            ),
            None => (self.handler)(ctx),
        }
    }
}

/// An ordered, immutable pipeline of stages applied uniformly to calls.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    stages: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// An empty chain: calls go straight to the handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a chain.
    pub fn builder() -> InterceptorChainBuilder {
        InterceptorChainBuilder::default()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the chain around `handler` for one call.
    pub fn run(
        &self,
        ctx: &mut CallContext,
        mut handler: impl FnMut(&mut CallContext) -> CallOutcome,
    ) -> CallOutcome {
        Next {
            stages: &self.stages,
            handler: &mut handler,
        }
        .run(ctx)
    }
}

/// Builder fixing stage order at service-binding time.
#[derive(Default)]
pub struct InterceptorChainBuilder {
    stages: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChainBuilder {
    /// Append a stage; stages run in the order they were added.
    pub fn stage(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.stages.push(Arc::new(interceptor));
        self
    }

    /// Append an already-shared stage.
    pub fn shared_stage(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.stages.push(interceptor);
        self
    }

    /// Finish the chain.
    pub fn build(self) -> InterceptorChain {
        InterceptorChain {
            stages: self.stages,
        }
    }
}

/// Server-side authentication stage.
///
/// Presence of the API key header (any value) delegates to the rest of
/// the chain; absence short-circuits with `UNAUTHENTICATED` and no
/// payload. Key lookup is exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAuth;

impl Interceptor for ApiKeyAuth {
    fn name(&self) -> &str {
        "api-key-auth"
    }

    fn call(&self, ctx: &mut CallContext, next: Next<'_, '_>) -> CallOutcome {
        if ctx.metadata().contains(API_KEY_HEADER) {
            next.run(ctx)
        } else {
            CallOutcome::rejected(CallStatus::unauthenticated(format!(
                "missing {} header",
                API_KEY_HEADER
            )))
        }
    }
}

/// Client-side stage that stamps the API key header onto every call.
#[derive(Debug, Clone)]
pub struct ApiKeyStamp {
    key: String,
}

impl ApiKeyStamp {
    /// Stage attaching the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Interceptor for ApiKeyStamp {
    fn name(&self) -> &str {
        "api-key-stamp"
    }

    fn call(&self, ctx: &mut CallContext, next: Next<'_, '_>) -> CallOutcome {
        if !ctx.metadata().contains(API_KEY_HEADER) {
            ctx.metadata_mut().insert(API_KEY_HEADER, self.key.clone());
        }
        next.run(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CancelToken, Metadata};
    use crate::status::StatusCode;
    use std::sync::Mutex;

    /// Records its name on entry, then delegates.
    struct Recorder {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn call(&self, ctx: &mut CallContext, next: Next<'_, '_>) -> CallOutcome {
            self.log.lock().unwrap().push(self.name.clone());
            next.run(ctx)
        }
    }

    fn ok_handler(_: &mut CallContext) -> CallOutcome {
        CallOutcome::success(serde_json::json!({ "result": {} }))
    }

    #[test]
    fn test_stage_order_is_deterministic() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::builder()
            .stage(Recorder {
                name: "first".into(),
                log: log.clone(),
            })
            .stage(Recorder {
                name: "second".into(),
                log: log.clone(),
            })
            .stage(Recorder {
                name: "third".into(),
                log: log.clone(),
            })
            .build();

        for _ in 0..2 {
            let mut ctx = CallContext::new();
            let outcome = chain.run(&mut ctx, &mut ok_handler);
            assert!(outcome.is_ok());
        }
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "third", "first", "second", "third"]
        );
        assert_eq!(chain.stage_names(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_auth_delegates_when_key_present() {
        let chain = InterceptorChain::builder().stage(ApiKeyAuth).build();
        let mut md = Metadata::new();
        md.insert(API_KEY_HEADER, "any-value-at-all");
        let mut ctx = CallContext::with_metadata(md);

        let mut handler_ran = false;
        let outcome = chain.run(&mut ctx, |_| {
            handler_ran = true;
            CallOutcome::success(serde_json::json!({ "result": {} }))
        });
        assert!(handler_ran);
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_auth_short_circuits_when_key_absent() {
        let chain = InterceptorChain::builder().stage(ApiKeyAuth).build();
        let mut ctx = CallContext::new();

        let mut handler_ran = false;
        let outcome = chain.run(&mut ctx, |_| {
            handler_ran = true;
            CallOutcome::success(serde_json::json!({ "result": {} }))
        });
        assert!(!handler_ran);
        assert_eq!(outcome.status().code, StatusCode::Unauthenticated);
        assert!(outcome.payload().is_none());
    }

    #[test]
    fn test_short_circuit_skips_downstream_stages() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::builder()
            .stage(ApiKeyAuth)
            .stage(Recorder {
                name: "after-auth".into(),
                log: log.clone(),
            })
            .build();
        let mut ctx = CallContext::new();
        let outcome = chain.run(&mut ctx, &mut ok_handler);
        assert_eq!(outcome.status().code, StatusCode::Unauthenticated);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cancelled_context_yields_cancelled_status() {
        let token = CancelToken::new();
        token.cancel();
        let mut ctx = CallContext::with_cancel_token(Metadata::new(), token);
        let chain = InterceptorChain::new();

        let mut handler_ran = false;
        let outcome = chain.run(&mut ctx, |_| {
            handler_ran = true;
            CallOutcome::success(serde_json::json!({ "result": {} }))
        });
        assert!(!handler_ran);
        assert_eq!(outcome.status().code, StatusCode::Cancelled);
    }

    #[test]
    fn test_cancellation_between_stages() {
        // A stage cancels the token mid-pipeline; the handler must not run.
        struct CancelInFlight;
        impl Interceptor for CancelInFlight {
            fn name(&self) -> &str {
                "cancel-in-flight"
            }
            fn call(&self, ctx: &mut CallContext, next: Next<'_, '_>) -> CallOutcome {
                ctx.cancel_token().cancel();
                next.run(ctx)
            }
        }

        let chain = InterceptorChain::builder().stage(CancelInFlight).build();
        let mut ctx = CallContext::new();
        let mut handler_ran = false;
        let outcome = chain.run(&mut ctx, |_| {
            handler_ran = true;
            CallOutcome::success(serde_json::json!({ "result": {} }))
        });
        assert!(!handler_ran);
        assert_eq!(outcome.status().code, StatusCode::Cancelled);
    }

    #[test]
    fn test_stamp_attaches_key_for_downstream_auth() {
        let chain = InterceptorChain::builder()
            .stage(ApiKeyStamp::new("client-key"))
            .stage(ApiKeyAuth)
            .build();
        let mut ctx = CallContext::new();
        let outcome = chain.run(&mut ctx, &mut ok_handler);
        assert!(outcome.is_ok());
        assert_eq!(ctx.metadata().get(API_KEY_HEADER), Some("client-key"));
    }
}
