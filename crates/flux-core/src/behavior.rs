//! Pipeline behavior traits and the chain continuation.
//!
//! A pipeline behavior wraps "the rest of the chain" — every behavior that
//! was registered after it, plus the terminal handler call — and may run code
//! before and after it, replace its result, or not invoke it at all.
//!
//! # The `Next` Continuation
//!
//! [`Next`] is a single-shot continuation: it is consumed by
//! [`run`](Next::run), so a behavior can invoke the rest of the chain at most
//! once. Dropping it without running short-circuits the dispatch, and the
//! behavior's own return value is what the caller sees.
//!
//! ```rust,ignore
//! struct Gate {
//!     open: AtomicBool,
//! }
//!
//! #[async_trait]
//! impl PipelineBehavior<i32> for Gate {
//!     async fn handle(
//!         &self,
//!         request: &dyn AnyRequest,
//!         next: Next<i32>,
//!         _cancel: &CancellationToken,
//!     ) -> i32 {
//!         if self.open.load(Ordering::SeqCst) {
//!             next.run().await
//!         } else {
//!             0
//!         }
//!     }
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::PublishOutcome;
use crate::notification::AnyNotification;
use crate::request::{AnyRequest, Request};

// ============================================================================
// Next
// ============================================================================

/// The rest of a dispatch chain, packaged as a single-shot continuation.
///
/// Invoking [`run`](Next::run) consumes the continuation, so the "at most
/// once" rule is enforced by the type system rather than by convention.
pub struct Next<Res> {
    inner: Box<dyn FnOnce() -> BoxFuture<'static, Res> + Send>,
}

impl<Res> Next<Res> {
    /// Wraps a closure producing the remainder of the chain.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> BoxFuture<'static, Res> + Send + 'static,
    {
        Self { inner: Box::new(f) }
    }

    /// Runs the rest of the chain to completion.
    pub async fn run(self) -> Res {
        (self.inner)().await
    }
}

impl<Res> fmt::Debug for Next<Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

// ============================================================================
// Request Behaviors
// ============================================================================

/// A scope-generic request interceptor.
///
/// Behaviors of this shape observe the request through the type-erased
/// [`AnyRequest`] view and are therefore registerable in the generic and
/// kind-marker scopes, where the concrete request type is not fixed. The
/// response type is the only type parameter: a behavior registered for
/// response `Res` participates in every matching dispatch whose handler
/// produces `Res`.
///
/// An implementation generic over `Res` applies to every request; it is
/// monomorphized at each registration call site.
#[async_trait]
pub trait PipelineBehavior<Res: Send + 'static>: Send + Sync {
    /// Wrap the rest of the chain for one dispatch.
    async fn handle(
        &self,
        request: &dyn AnyRequest,
        next: Next<Res>,
        cancel: &CancellationToken,
    ) -> Res;
}

/// A request interceptor typed by the concrete request.
///
/// The exact-type scope convenience: implementations receive `&R` directly
/// instead of downcasting an [`AnyRequest`] view. Adapted into a
/// [`PipelineBehavior`] when registered.
#[async_trait]
pub trait RequestBehavior<R: Request>: Send + Sync {
    /// Wrap the rest of the chain for one dispatch of `R`.
    async fn handle(
        &self,
        request: &R,
        next: Next<R::Response>,
        cancel: &CancellationToken,
    ) -> R::Response;
}

// ============================================================================
// Notification Behaviors
// ============================================================================

/// A notification interceptor.
///
/// Notification pipelines produce [`PublishOutcome`]; a behavior may observe
/// a failing outcome on its way out but the engine never translates it.
/// Registerable against an exact notification type or against every
/// notification.
#[async_trait]
pub trait NotificationBehavior: Send + Sync {
    /// Wrap the rest of the chain for one publish.
    async fn handle(
        &self,
        notification: &dyn AnyNotification,
        next: Next<PublishOutcome>,
        cancel: &CancellationToken,
    ) -> PublishOutcome;
}
