//! Notification types for the Flux mediator.
//!
//! A notification is a broadcast event with no declared response. Unlike
//! requests, a notification type may have any number of independent
//! subscribers; the publisher runs them all within one pipeline.

use std::any::Any;

/// The base trait for all notifications published through the mediator.
///
/// Notifications are plain values. Delivery is not optional: publishing a
/// notification type with no registered subscriber is an error.
pub trait Notification: Send + Sync + 'static {}

/// A type-erased view of a notification travelling through the pipeline.
///
/// The notification analogue of
/// [`AnyRequest`](crate::request::AnyRequest); implemented for every
/// [`Notification`] type by a blanket implementation.
pub trait AnyNotification: Send + Sync {
    /// Returns the full type name of the concrete notification.
    fn name(&self) -> &'static str;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<N: Notification> AnyNotification for N {
    fn name(&self) -> &'static str {
        std::any::type_name::<N>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OrderShipped {
        order_id: u64,
    }

    impl Notification for OrderShipped {}

    #[test]
    fn erased_view_downcasts_to_concrete_type() {
        let notification = OrderShipped { order_id: 7 };
        let erased: &dyn AnyNotification = &notification;
        assert!(erased.name().ends_with("OrderShipped"));
        let concrete = erased.as_any().downcast_ref::<OrderShipped>();
        assert_eq!(concrete.map(|n| n.order_id), Some(7));
    }
}
