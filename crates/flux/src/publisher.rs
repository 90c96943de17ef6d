//! Notification dispatch engine.
//!
//! [`Publisher`] fans a notification out to every subscriber registered for
//! its runtime type, through one behavior pipeline built per publish. The
//! subscribers run inside the terminal step, sequentially in registration
//! order, so each behavior observes the publish exactly once however many
//! subscribers there are. The first subscriber failure stops the remaining
//! ones and propagates to the caller untranslated.
//!
//! Delivery is not optional: publishing a notification type with no
//! registered subscriber fails with
//! [`PublishError::HandlerNotFound`] rather than completing silently.

use std::any::TypeId;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{Instrument, debug, debug_span};

use flux_core::{
    CancellationToken, Next, Notification, PublishError, PublishOutcome, PublishResult,
};

use crate::pipeline::{Layer, compose};
use crate::registry::{Registry, ScopeOrder};

/// The notification dispatch engine.
///
/// Cheap to clone; all clones share the same frozen registry. Concurrent
/// `publish` calls are fully independent.
#[derive(Clone)]
pub struct Publisher {
    registry: Arc<Registry>,
}

impl Publisher {
    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Publishes a notification with a fresh, never-cancelled token.
    pub async fn publish<N: Notification>(&self, notification: N) -> PublishResult {
        self.publish_with(notification, CancellationToken::new())
            .await
    }

    /// Publishes a notification, threading `cancel` through every behavior
    /// and subscriber unchanged.
    ///
    /// Returns once every behavior and subscriber has completed; there are no
    /// fire-and-forget semantics.
    pub async fn publish_with<N: Notification>(
        &self,
        notification: N,
        cancel: CancellationToken,
    ) -> PublishResult {
        let name = std::any::type_name::<N>();
        let span = debug_span!("publish", notification = name);
        let entered = span.enter();

        let subscribers = self.registry.subscribers::<N>();
        if subscribers.is_empty() {
            return Err(PublishError::HandlerNotFound { notification: name });
        }
        let behaviors = self.resolve_behaviors(TypeId::of::<N>());
        debug!(
            subscribers = subscribers.len(),
            behaviors = behaviors.len(),
            "publishing notification"
        );

        let notification = Arc::new(notification);
        let terminal: Next<PublishOutcome> = {
            let notification = Arc::clone(&notification);
            let cancel = cancel.clone();
            Next::new(move || {
                async move {
                    for subscriber in &subscribers {
                        subscriber.handle(notification.as_ref(), &cancel).await?;
                    }
                    Ok(())
                }
                .boxed()
            })
        };
        let layers = behaviors
            .into_iter()
            .map(|behavior| {
                let notification = Arc::clone(&notification);
                let cancel = cancel.clone();
                let layer: Layer<_> = Box::new(move |next| {
                    async move {
                        behavior
                            .handle(notification.as_ref(), next, &cancel)
                            .await
                    }
                    .boxed()
                });
                layer
            })
            .collect();
        let chain = compose(terminal, layers);

        drop(entered);
        chain
            .run()
            .instrument(span)
            .await
            .map_err(PublishError::Handler)
    }

    fn resolve_behaviors(
        &self,
        notification: TypeId,
    ) -> Vec<Arc<dyn flux_core::NotificationBehavior>> {
        let exact = self.registry.notification_behaviors(notification);
        let broadcast = self.registry.broadcast_behaviors();

        let mut behaviors;
        match self.registry.scope_order() {
            ScopeOrder::ExactFirst => {
                behaviors = exact;
                behaviors.extend(broadcast);
            }
            ScopeOrder::GenericFirst => {
                behaviors = broadcast;
                behaviors.extend(exact);
            }
        }
        behaviors
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("registry", &self.registry)
            .finish()
    }
}
