//! Request dispatch engine.
//!
//! [`Sender`] routes a request to the single handler bound to its runtime
//! type, wraps the call in every pipeline behavior whose scope matches, and
//! executes the composed chain. One `send` is one chain execution: the engine
//! holds no state across calls, never retries, and never touches the result
//! or any failure travelling through the chain.
//!
//! # Behavior Resolution
//!
//! Three scopes can match one request:
//!
//! 1. the exact request type,
//! 2. the generic scope — every request producing this response type,
//! 3. the kind scope, when the request declares itself a command or query.
//!
//! The scopes are consulted in the order configured by
//! [`ScopeOrder`] (default: exact, generic, kind) and their behavior lists
//! concatenated; this concatenation alone determines nesting. Within one
//! scope, registration order is preserved, and the first behavior of the
//! concatenation is outermost.

use std::any::TypeId;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{Instrument, debug, debug_span};

use flux_core::{
    CancellationToken, Next, PipelineBehavior, Request, RequestKind, SendError, SendResult,
};

use crate::pipeline::{Layer, compose};
use crate::registry::{Registry, ScopeKey, ScopeOrder};

/// The request dispatch engine.
///
/// Cheap to clone; all clones share the same frozen registry. Concurrent
/// `send` calls are fully independent.
#[derive(Clone)]
pub struct Sender {
    registry: Arc<Registry>,
}

impl Sender {
    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Dispatches a request with a fresh, never-cancelled token.
    pub async fn send<R: Request>(&self, request: R) -> SendResult<R::Response> {
        self.send_with(request, CancellationToken::new()).await
    }

    /// Dispatches a request, threading `cancel` through every behavior and
    /// the handler unchanged.
    ///
    /// Fails with [`SendError::HandlerNotFound`] when no handler is bound to
    /// the request type — a caller configuration error, never retried. The
    /// engine itself never observes the token; reacting to cancellation is
    /// each layer's responsibility.
    pub async fn send_with<R: Request>(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> SendResult<R::Response> {
        let name = std::any::type_name::<R>();
        let span = debug_span!("send", request = name, kind = R::KIND.as_str());
        let entered = span.enter();

        let handler = self
            .registry
            .request_handler::<R>()
            .ok_or(SendError::HandlerNotFound { request: name })?;
        let behaviors = self.resolve_behaviors::<R>();
        debug!(behaviors = behaviors.len(), "dispatching request");

        let request = Arc::new(request);
        let terminal = {
            let request = Arc::clone(&request);
            let cancel = cancel.clone();
            Next::new(move || {
                async move { handler.handle(request.as_ref(), &cancel).await }.boxed()
            })
        };
        let layers = behaviors
            .into_iter()
            .map(|behavior| {
                let request = Arc::clone(&request);
                let cancel = cancel.clone();
                let layer: Layer<R::Response> = Box::new(move |next| {
                    async move { behavior.handle(request.as_ref(), next, &cancel).await }.boxed()
                });
                layer
            })
            .collect();
        let chain = compose(terminal, layers);

        drop(entered);
        Ok(chain.run().instrument(span).await)
    }

    /// Concatenates the behaviors of every scope matching `R`.
    fn resolve_behaviors<R: Request>(&self) -> Vec<Arc<dyn PipelineBehavior<R::Response>>> {
        let exact = ScopeKey::Exact {
            request: TypeId::of::<R>(),
        };
        let generic = ScopeKey::Kind {
            kind: RequestKind::Request,
            response: TypeId::of::<R::Response>(),
        };
        let kind = match R::KIND {
            RequestKind::Request => None,
            declared => Some(ScopeKey::Kind {
                kind: declared,
                response: TypeId::of::<R::Response>(),
            }),
        };

        let scopes = match self.registry.scope_order() {
            ScopeOrder::ExactFirst => [Some(exact), Some(generic), kind],
            ScopeOrder::GenericFirst => [Some(generic), kind, Some(exact)],
        };

        let mut behaviors = Vec::new();
        for scope in scopes.into_iter().flatten() {
            behaviors.extend(self.registry.behaviors_in_scope::<R::Response>(scope));
        }
        behaviors
    }
}

impl std::fmt::Debug for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender")
            .field("registry", &self.registry)
            .finish()
    }
}
