//! Handler traits for the Flux mediator.
//!
//! Handlers are the terminal capabilities of a dispatch pipeline: a
//! [`RequestHandler`] performs the actual operation for a request, and a
//! [`NotificationHandler`] reacts to a published notification. The dispatch
//! engine calls a statically known method on a polymorphic reference; there
//! is no name-based or reflective invocation anywhere.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Echo(i32);
//!
//! impl Request for Echo {
//!     type Response = i32;
//! }
//!
//! struct EchoHandler;
//!
//! #[async_trait]
//! impl RequestHandler<Echo> for EchoHandler {
//!     async fn handle(&self, request: &Echo, _cancel: &CancellationToken) -> i32 {
//!         request.0
//!     }
//! }
//! ```

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::PublishOutcome;
use crate::notification::Notification;
use crate::request::Request;

/// The terminal capability for a request type.
///
/// Exactly one handler is bound to each request type. The cancellation token
/// is the caller's, threaded through the pipeline unchanged; observing it and
/// aborting early is the handler's responsibility.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Perform the operation and produce the declared response.
    async fn handle(&self, request: &R, cancel: &CancellationToken) -> R::Response;
}

/// A subscriber capability for a notification type.
///
/// A notification type may have any number of subscribers. A subscriber
/// failure is returned as a boxed error and propagates to the publisher's
/// caller without translation.
#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync {
    /// React to the notification.
    async fn handle(&self, notification: &N, cancel: &CancellationToken) -> PublishOutcome;
}
