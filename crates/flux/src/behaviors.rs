//! Built-in pipeline behaviors.
//!
//! Ready-made cross-cutting behaviors for the most common concern: seeing
//! dispatches happen. Both emit structured `tracing` events around the rest
//! of the chain and pass results through untouched.

use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use flux_core::{
    AnyNotification, AnyRequest, CancellationToken, Next, NotificationBehavior, PipelineBehavior,
    PublishOutcome,
};

/// Logs entry, exit and elapsed time of every matching request dispatch.
///
/// Generic over the response type; register it once per response type in use:
///
/// ```rust,ignore
/// Mediator::builder()
///     .register_pipeline_behavior::<i32, _>(RequestKind::Request, TracingBehavior)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBehavior;

#[async_trait]
impl<Res: Send + 'static> PipelineBehavior<Res> for TracingBehavior {
    async fn handle(
        &self,
        request: &dyn AnyRequest,
        next: Next<Res>,
        _cancel: &CancellationToken,
    ) -> Res {
        let started = Instant::now();
        debug!(
            request = request.name(),
            kind = request.kind().as_str(),
            "handling request"
        );
        let response = next.run().await;
        debug!(
            request = request.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request handled"
        );
        response
    }
}

/// Logs entry, exit and elapsed time of every matching publish.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationTracingBehavior;

#[async_trait]
impl NotificationBehavior for NotificationTracingBehavior {
    async fn handle(
        &self,
        notification: &dyn AnyNotification,
        next: Next<PublishOutcome>,
        _cancel: &CancellationToken,
    ) -> PublishOutcome {
        let started = Instant::now();
        debug!(notification = notification.name(), "handling notification");
        let outcome = next.run().await;
        debug!(
            notification = notification.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "notification handled"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mediator::Mediator;
    use flux_core::{Notification, NotificationHandler, Request, RequestHandler, RequestKind};

    struct Echo(i32);

    impl Request for Echo {
        type Response = i32;
    }

    struct EchoHandler;

    #[async_trait]
    impl RequestHandler<Echo> for EchoHandler {
        async fn handle(&self, request: &Echo, _cancel: &CancellationToken) -> i32 {
            request.0
        }
    }

    struct Tick;

    impl Notification for Tick {}

    struct TickSubscriber;

    #[async_trait]
    impl NotificationHandler<Tick> for TickSubscriber {
        async fn handle(
            &self,
            _notification: &Tick,
            _cancel: &CancellationToken,
        ) -> PublishOutcome {
            Ok(())
        }
    }

    #[tokio::test]
    async fn tracing_behaviors_pass_results_through() {
        let mediator = Mediator::builder()
            .register_handler(EchoHandler)
            .unwrap()
            .register_pipeline_behavior::<i32, _>(RequestKind::Request, TracingBehavior)
            .register_subscriber(TickSubscriber)
            .register_broadcast_behavior(NotificationTracingBehavior)
            .build();

        assert_eq!(mediator.send(Echo(11)).await.unwrap(), 11);
        mediator.publish(Tick).await.unwrap();
    }
}
