//! The combined mediator facade.
//!
//! [`Mediator`] bundles the request dispatch engine ([`Sender`]) and the
//! notification dispatch engine ([`Publisher`]) over one frozen registry.
//! Most applications keep a single `Mediator` and call
//! [`send`](Mediator::send) / [`publish`](Mediator::publish) on it directly;
//! components that only ever dispatch one way can hold the narrower
//! [`Sender`] or [`Publisher`] handle instead.

use std::sync::Arc;

use flux_core::{CancellationToken, Notification, PublishResult, Request, SendResult};

use crate::builder::MediatorBuilder;
use crate::publisher::Publisher;
use crate::registry::{Registry, RegistryStats};
use crate::sender::Sender;

/// Request dispatch and notification fan-out over one registry.
///
/// Cheap to clone and safe to share: the registry is read-only once built,
/// so concurrent dispatches need no locking.
#[derive(Debug, Clone)]
pub struct Mediator {
    registry: Arc<Registry>,
    sender: Sender,
    publisher: Publisher,
}

impl Mediator {
    /// Starts an empty registration builder.
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self {
            sender: Sender::new(Arc::clone(&registry)),
            publisher: Publisher::new(Arc::clone(&registry)),
            registry,
        }
    }

    /// Dispatches a request to its handler. See [`Sender::send`].
    pub async fn send<R: Request>(&self, request: R) -> SendResult<R::Response> {
        self.sender.send(request).await
    }

    /// Dispatches a request with the caller's cancellation token. See
    /// [`Sender::send_with`].
    pub async fn send_with<R: Request>(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> SendResult<R::Response> {
        self.sender.send_with(request, cancel).await
    }

    /// Publishes a notification to its subscribers. See
    /// [`Publisher::publish`].
    pub async fn publish<N: Notification>(&self, notification: N) -> PublishResult {
        self.publisher.publish(notification).await
    }

    /// Publishes a notification with the caller's cancellation token. See
    /// [`Publisher::publish_with`].
    pub async fn publish_with<N: Notification>(
        &self,
        notification: N,
        cancel: CancellationToken,
    ) -> PublishResult {
        self.publisher.publish_with(notification, cancel).await
    }

    /// Returns a standalone request dispatch handle.
    pub fn sender(&self) -> Sender {
        self.sender.clone()
    }

    /// Returns a standalone notification dispatch handle.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// Returns counts of everything registered.
    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flux_core::{NotificationHandler, PublishOutcome, RequestHandler};

    struct Ping;

    impl Request for Ping {
        type Response = &'static str;
    }

    struct PingHandler;

    #[async_trait]
    impl RequestHandler<Ping> for PingHandler {
        async fn handle(&self, _request: &Ping, _cancel: &CancellationToken) -> &'static str {
            "pong"
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
    async fn standalone_handles_share_the_registry() {
        let mediator = Mediator::builder()
            .register_handler(PingHandler)
            .unwrap()
            .register_subscriber(TickSubscriber)
            .build();

        let sender = mediator.sender();
        let publisher = mediator.publisher();
        drop(mediator);

        assert_eq!(sender.send(Ping).await.unwrap(), "pong");
        publisher.publish(Tick).await.unwrap();
    }

    #[tokio::test]
    async fn stats_reflect_registrations() {
        let mediator = Mediator::builder()
            .register_handler(PingHandler)
            .unwrap()
            .register_subscriber(TickSubscriber)
            .register_subscriber(TickSubscriber)
            .build();

        let stats = mediator.stats();
        assert_eq!(stats.request_handlers, 1);
        assert_eq!(stats.subscribers, 2);
    }
}
