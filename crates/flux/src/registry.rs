//! Typed registry backing the dispatch engines.
//!
//! The registry maps runtime types to handler and behavior slots. Keys are
//! [`TypeId`]s captured at the registration call site, where the concrete
//! types are statically known; the dispatch engines look slots up by the same
//! key and recover the typed reference. Key and slot are bound together at
//! insertion, so a lookup that hits always recovers the type it stored.
//!
//! The registry is populated through
//! [`MediatorBuilder`](crate::builder::MediatorBuilder) and frozen at build
//! time: during dispatch it is shared immutably behind an `Arc`, safe for
//! concurrent reads with no locking.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use flux_core::{
    Notification, NotificationBehavior, NotificationHandler, PipelineBehavior, RegistryError,
    RegistryResult, Request, RequestHandler, RequestKind,
};

/// A registered handler or behavior with its concrete type erased.
type AnySlot = Box<dyn Any + Send + Sync>;

// =============================================================================
// Scopes
// =============================================================================

/// Key of a request-behavior scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ScopeKey {
    /// Behaviors bound to one concrete request type.
    Exact { request: TypeId },
    /// Behaviors bound to a kind marker for one response type.
    ///
    /// `RequestKind::Request` is the fully generic scope: every request
    /// producing this response type matches it.
    Kind {
        kind: RequestKind,
        response: TypeId,
    },
}

/// Order in which behavior scopes are consulted while assembling a pipeline.
///
/// Within one scope, behaviors always keep their registration order; this
/// policy only fixes the relative order of the scopes themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeOrder {
    /// Exact-type behaviors first, then the generic scope, then the kind
    /// scope. For notifications: exact-type, then broadcast.
    #[default]
    ExactFirst,
    /// The generic scope first, then the kind scope, then exact-type
    /// behaviors. For notifications: broadcast, then exact-type.
    GenericFirst,
}

// =============================================================================
// Registry
// =============================================================================

/// The frozen handler and behavior registry.
///
/// Constructed by [`MediatorBuilder`](crate::builder::MediatorBuilder); the
/// dispatch engines only read it.
pub struct Registry {
    request_handlers: HashMap<TypeId, AnySlot>,
    notification_handlers: HashMap<TypeId, Vec<AnySlot>>,
    request_behaviors: HashMap<ScopeKey, Vec<AnySlot>>,
    notification_behaviors: HashMap<TypeId, Vec<Arc<dyn NotificationBehavior>>>,
    broadcast_behaviors: Vec<Arc<dyn NotificationBehavior>>,
    scope_order: ScopeOrder,
}

impl Registry {
    pub(crate) fn new(scope_order: ScopeOrder) -> Self {
        Self {
            request_handlers: HashMap::new(),
            notification_handlers: HashMap::new(),
            request_behaviors: HashMap::new(),
            notification_behaviors: HashMap::new(),
            broadcast_behaviors: Vec::new(),
            scope_order,
        }
    }

    pub(crate) fn set_scope_order(&mut self, order: ScopeOrder) {
        self.scope_order = order;
    }

    /// The configured cross-scope consultation order.
    pub fn scope_order(&self) -> ScopeOrder {
        self.scope_order
    }

    // ─── Registration ─────────────────────────────────────────────────────────

    pub(crate) fn insert_request_handler<R, H>(&mut self, handler: H) -> RegistryResult<()>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        match self.request_handlers.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateHandler {
                request: std::any::type_name::<R>(),
            }),
            Entry::Vacant(slot) => {
                let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
                slot.insert(Box::new(handler));
                Ok(())
            }
        }
    }

    pub(crate) fn insert_notification_handler<N, H>(&mut self, handler: H)
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        let handler: Arc<dyn NotificationHandler<N>> = Arc::new(handler);
        self.notification_handlers
            .entry(TypeId::of::<N>())
            .or_default()
            .push(Box::new(handler));
    }

    pub(crate) fn insert_request_behavior<Res>(
        &mut self,
        scope: ScopeKey,
        behavior: Arc<dyn PipelineBehavior<Res>>,
    ) where
        Res: Send + 'static,
    {
        self.request_behaviors
            .entry(scope)
            .or_default()
            .push(Box::new(behavior));
    }

    pub(crate) fn insert_notification_behavior(
        &mut self,
        notification: TypeId,
        behavior: Arc<dyn NotificationBehavior>,
    ) {
        self.notification_behaviors
            .entry(notification)
            .or_default()
            .push(behavior);
    }

    pub(crate) fn insert_broadcast_behavior(&mut self, behavior: Arc<dyn NotificationBehavior>) {
        self.broadcast_behaviors.push(behavior);
    }

    // ─── Resolution ───────────────────────────────────────────────────────────

    /// Resolves the single handler bound to the request type, if any.
    pub(crate) fn request_handler<R: Request>(&self) -> Option<Arc<dyn RequestHandler<R>>> {
        self.request_handlers
            .get(&TypeId::of::<R>())
            .and_then(|slot| slot.downcast_ref::<Arc<dyn RequestHandler<R>>>())
            .cloned()
    }

    /// Resolves every subscriber bound to the notification type, in
    /// registration order.
    pub(crate) fn subscribers<N: Notification>(&self) -> Vec<Arc<dyn NotificationHandler<N>>> {
        self.notification_handlers
            .get(&TypeId::of::<N>())
            .map(|slots| {
                slots
                    .iter()
                    .filter_map(|slot| slot.downcast_ref::<Arc<dyn NotificationHandler<N>>>())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves the behaviors of one scope, in registration order.
    pub(crate) fn behaviors_in_scope<Res>(
        &self,
        scope: ScopeKey,
    ) -> Vec<Arc<dyn PipelineBehavior<Res>>>
    where
        Res: Send + 'static,
    {
        self.request_behaviors
            .get(&scope)
            .map(|slots| {
                slots
                    .iter()
                    .filter_map(|slot| slot.downcast_ref::<Arc<dyn PipelineBehavior<Res>>>())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves the exact-scope behaviors of one notification type.
    pub(crate) fn notification_behaviors(
        &self,
        notification: TypeId,
    ) -> Vec<Arc<dyn NotificationBehavior>> {
        self.notification_behaviors
            .get(&notification)
            .cloned()
            .unwrap_or_default()
    }

    /// Resolves the behaviors applying to every notification.
    pub(crate) fn broadcast_behaviors(&self) -> Vec<Arc<dyn NotificationBehavior>> {
        self.broadcast_behaviors.clone()
    }

    /// Returns counts of everything registered.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            request_handlers: self.request_handlers.len(),
            subscribers: self.notification_handlers.values().map(Vec::len).sum(),
            request_behaviors: self.request_behaviors.values().map(Vec::len).sum(),
            notification_behaviors: self.notification_behaviors.values().map(Vec::len).sum::<usize>()
                + self.broadcast_behaviors.len(),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("stats", &self.stats())
            .field("scope_order", &self.scope_order)
            .finish()
    }
}

/// Statistics about a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of bound request handlers.
    pub request_handlers: usize,
    /// Total number of notification subscribers.
    pub subscribers: usize,
    /// Total number of request behaviors across all scopes.
    pub request_behaviors: usize,
    /// Total number of notification behaviors, broadcast included.
    pub notification_behaviors: usize,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} request handler(s), {} subscriber(s), {} request behavior(s), {} notification behavior(s)",
            self.request_handlers, self.subscribers, self.request_behaviors,
            self.notification_behaviors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flux_core::CancellationToken;

    struct Ping;

    impl Request for Ping {
        type Response = u32;
    }

    struct PingHandler;

    #[async_trait]
    impl RequestHandler<Ping> for PingHandler {
        async fn handle(&self, _request: &Ping, _cancel: &CancellationToken) -> u32 {
            1
        }
    }

    #[test]
    fn duplicate_request_handler_is_rejected() {
        let mut registry = Registry::new(ScopeOrder::default());
        registry.insert_request_handler::<Ping, _>(PingHandler).unwrap();

        let err = registry
            .insert_request_handler::<Ping, _>(PingHandler)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateHandler { request } if request.ends_with("Ping")
        ));
    }

    #[test]
    fn missing_lookups_resolve_to_nothing() {
        let registry = Registry::new(ScopeOrder::default());
        assert!(registry.request_handler::<Ping>().is_none());
        assert!(
            registry
                .behaviors_in_scope::<u32>(ScopeKey::Exact {
                    request: TypeId::of::<Ping>(),
                })
                .is_empty()
        );
    }

    #[test]
    fn stats_count_each_slot_kind() {
        let mut registry = Registry::new(ScopeOrder::default());
        registry.insert_request_handler::<Ping, _>(PingHandler).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.request_handlers, 1);
        assert_eq!(stats.subscribers, 0);
        assert_eq!(
            stats.to_string(),
            "1 request handler(s), 0 subscriber(s), 0 request behavior(s), 0 notification behavior(s)"
        );
    }
}
