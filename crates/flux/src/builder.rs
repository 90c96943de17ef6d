//! Registration surface for the mediator.
//!
//! [`MediatorBuilder`] wires handlers and pipeline behaviors into the
//! [`Registry`](crate::registry::Registry) before any dispatch occurs, then
//! freezes the result into a [`Mediator`]. Scope and contract compatibility
//! are enforced by the trait bounds of each `register_*` method; the one
//! registration error that remains representable — binding a second handler
//! to a request type — is reported as
//! [`RegistryError::DuplicateHandler`](flux_core::RegistryError).
//!
//! # Example
//!
//! ```rust,ignore
//! let mediator = Mediator::builder()
//!     .register_handler(EchoHandler)?
//!     .register_request_behavior::<Echo, _>(AuditBehavior::default())
//!     .register_pipeline_behavior::<i32, _>(RequestKind::Request, TracingBehavior)
//!     .register_subscriber(ShipmentMailer::new(smtp))
//!     .build();
//! ```

use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use flux_core::{
    AnyRequest, CancellationToken, Next, Notification, NotificationBehavior, NotificationHandler,
    PipelineBehavior, RegistryResult, Request, RequestBehavior, RequestHandler, RequestKind,
};

use crate::mediator::Mediator;
use crate::registry::{Registry, ScopeKey, ScopeOrder};

/// Builder assembling the registry behind a [`Mediator`].
///
/// All registration happens up front; the built mediator shares the frozen
/// registry immutably across every dispatch.
#[derive(Debug)]
pub struct MediatorBuilder {
    registry: Registry,
}

impl MediatorBuilder {
    /// Creates an empty builder with the default scope order.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(ScopeOrder::default()),
        }
    }

    /// Sets the cross-scope behavior consultation order.
    pub fn scope_order(mut self, order: ScopeOrder) -> Self {
        self.registry.set_scope_order(order);
        self
    }

    /// Binds the handler for a request type.
    ///
    /// Exactly one handler may be bound per request type; a second
    /// registration fails.
    pub fn register_handler<R, H>(mut self, handler: H) -> RegistryResult<Self>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        self.registry.insert_request_handler::<R, _>(handler)?;
        Ok(self)
    }

    /// Adds a subscriber for a notification type.
    ///
    /// A notification type may have any number of subscribers; they run in
    /// registration order.
    pub fn register_subscriber<N, H>(mut self, handler: H) -> Self
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        self.registry.insert_notification_handler::<N, _>(handler);
        self
    }

    /// Adds an exact-scope behavior for one request type.
    ///
    /// The behavior receives the concrete request; it participates only in
    /// dispatches of `R`.
    pub fn register_request_behavior<R, B>(mut self, behavior: B) -> Self
    where
        R: Request,
        B: RequestBehavior<R> + 'static,
    {
        let adapted: Arc<dyn PipelineBehavior<R::Response>> = Arc::new(TypedRequestBehavior {
            behavior,
            _marker: PhantomData::<fn() -> R>,
        });
        self.registry.insert_request_behavior(
            ScopeKey::Exact {
                request: TypeId::of::<R>(),
            },
            adapted,
        );
        self
    }

    /// Adds a kind-scoped behavior for one response type.
    ///
    /// With `RequestKind::Request` the behavior participates in every
    /// dispatch producing `Res` — the fully generic scope. With
    /// `RequestKind::Command` or `RequestKind::Query` it participates only in
    /// dispatches of requests declaring that kind. A behavior implementation
    /// generic over `Res` is monomorphized here, at the registration site.
    pub fn register_pipeline_behavior<Res, B>(mut self, kind: RequestKind, behavior: B) -> Self
    where
        Res: Send + 'static,
        B: PipelineBehavior<Res> + 'static,
    {
        self.registry.insert_request_behavior(
            ScopeKey::Kind {
                kind,
                response: TypeId::of::<Res>(),
            },
            Arc::new(behavior),
        );
        self
    }

    /// Adds an exact-scope behavior for one notification type.
    pub fn register_notification_behavior<N, B>(mut self, behavior: B) -> Self
    where
        N: Notification,
        B: NotificationBehavior + 'static,
    {
        self.registry
            .insert_notification_behavior(TypeId::of::<N>(), Arc::new(behavior));
        self
    }

    /// Adds a behavior participating in every publish, regardless of the
    /// notification type.
    pub fn register_broadcast_behavior<B>(mut self, behavior: B) -> Self
    where
        B: NotificationBehavior + 'static,
    {
        self.registry.insert_broadcast_behavior(Arc::new(behavior));
        self
    }

    /// Freezes the registry and produces the mediator.
    pub fn build(self) -> Mediator {
        Mediator::new(Arc::new(self.registry))
    }
}

impl Default for MediatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter registering a typed [`RequestBehavior`] under the exact-type
/// scope.
///
/// The scope key is this request's `TypeId`, so the downcast below cannot
/// miss; if it ever did, the adapter steps aside and the rest of the chain
/// runs untouched.
struct TypedRequestBehavior<R, B> {
    behavior: B,
    _marker: PhantomData<fn() -> R>,
}

#[async_trait]
impl<R, B> PipelineBehavior<R::Response> for TypedRequestBehavior<R, B>
where
    R: Request,
    B: RequestBehavior<R> + 'static,
{
    async fn handle(
        &self,
        request: &dyn AnyRequest,
        next: Next<R::Response>,
        cancel: &CancellationToken,
    ) -> R::Response {
        match request.as_any().downcast_ref::<R>() {
            Some(request) => self.behavior.handle(request, next, cancel).await,
            None => next.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::RegistryError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Transfer(u32);

    impl Request for Transfer {
        type Response = u32;
        const KIND: RequestKind = RequestKind::Command;
    }

    struct Balance;

    impl Request for Balance {
        type Response = u32;
        const KIND: RequestKind = RequestKind::Query;
    }

    struct Transferred;

    #[async_trait]
    impl RequestHandler<Transfer> for Transferred {
        async fn handle(&self, request: &Transfer, _cancel: &CancellationToken) -> u32 {
            request.0
        }
    }

    struct Balanced;

    #[async_trait]
    impl RequestHandler<Balance> for Balanced {
        async fn handle(&self, _request: &Balance, _cancel: &CancellationToken) -> u32 {
            100
        }
    }

    /// Counts every dispatch it participates in.
    struct Tracking {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PipelineBehavior<u32> for Tracking {
        async fn handle(
            &self,
            _request: &dyn flux_core::AnyRequest,
            next: Next<u32>,
            _cancel: &CancellationToken,
        ) -> u32 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            next.run().await
        }
    }

    #[tokio::test]
    async fn duplicate_handler_registration_fails() {
        let err = Mediator::builder()
            .register_handler(Transferred)
            .unwrap()
            .register_handler(Transferred)
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::DuplicateHandler { request } if request.ends_with("Transfer")
        ));
    }

    #[tokio::test]
    async fn command_scope_excludes_queries() {
        let command_calls = Arc::new(AtomicUsize::new(0));
        let mediator = Mediator::builder()
            .register_handler(Transferred)
            .unwrap()
            .register_handler(Balanced)
            .unwrap()
            .register_pipeline_behavior::<u32, _>(
                RequestKind::Command,
                Tracking {
                    calls: Arc::clone(&command_calls),
                },
            )
            .build();

        assert_eq!(mediator.send(Transfer(25)).await.unwrap(), 25);
        assert_eq!(mediator.send(Balance).await.unwrap(), 100);
        assert_eq!(command_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generic_scope_sees_every_kind() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mediator = Mediator::builder()
            .register_handler(Transferred)
            .unwrap()
            .register_handler(Balanced)
            .unwrap()
            .register_pipeline_behavior::<u32, _>(
                RequestKind::Request,
                Tracking {
                    calls: Arc::clone(&calls),
                },
            )
            .build();

        mediator.send(Transfer(1)).await.unwrap();
        mediator.send(Balance).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
