//! # Flux Core
//!
//! The contract surface of the Flux mediator.
//!
//! This crate defines the value-type traits ([`Request`], [`Notification`]),
//! the terminal capabilities ([`RequestHandler`], [`NotificationHandler`]),
//! the interceptor capabilities ([`PipelineBehavior`], [`RequestBehavior`],
//! [`NotificationBehavior`]) together with the [`Next`] continuation, and the
//! error taxonomy. The dispatch engine itself lives in the `flux` crate.
//!
//! Everything here is executor-agnostic: trait methods are async via
//! `async-trait`, chains are `futures` boxed futures, and cancellation is a
//! cooperative [`CancellationToken`] threaded through every layer unchanged.

pub mod behavior;
pub mod error;
pub mod handler;
pub mod notification;
pub mod request;

pub use behavior::{Next, NotificationBehavior, PipelineBehavior, RequestBehavior};
pub use error::{
    BoxError, PublishError, PublishOutcome, PublishResult, RegistryError, RegistryResult,
    SendError, SendResult,
};
pub use handler::{NotificationHandler, RequestHandler};
pub use notification::{AnyNotification, Notification};
pub use request::{AnyRequest, Request, RequestKind};

// Re-exported so downstream crates name the same cancellation type the
// handler and behavior traits are written against.
pub use tokio_util::sync::CancellationToken;
