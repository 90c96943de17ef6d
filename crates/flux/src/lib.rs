//! # Flux
//!
//! An in-process mediator: typed request/response dispatch and notification
//! fan-out through composable pipeline behaviors.
//!
//! ## Overview
//!
//! Callers issue a typed request and Flux routes it, without compile-time
//! coupling, to exactly one registered handler. Cross-cutting concerns —
//! logging, validation, timing, guards — are ordinary pipeline behaviors
//! wrapped around the handler call in onion order. Notifications broadcast a
//! value to every registered subscriber through a parallel behavior pipeline.
//!
//! ## Architecture
//!
//! All dispatch flows through one frozen registry:
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌───────────────────────────────────┐
//! │  caller  │───▶│   Sender   │───▶│ behavior A ▶ behavior B ▶ handler │
//! │          │───▶│ Publisher  │───▶│ behavior ▶ subscriber, subscriber │
//! └──────────┘    └────────────┘    └───────────────────────────────────┘
//! ```
//!
//! - **Registry**: maps runtime types to handlers, subscribers and scoped
//!   behavior lists; populated once, read-only afterwards
//! - **Sender**: resolves the handler and matching behaviors for a request,
//!   composes the chain, executes it
//! - **Publisher**: same for notifications, with all subscribers delivered
//!   inside one chain
//! - **Behaviors**: user-defined interceptors receiving the request and the
//!   rest of the chain as a single-shot continuation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flux::prelude::*;
//!
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
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mediator = Mediator::builder()
//!         .register_handler(EchoHandler)?
//!         .register_pipeline_behavior::<i32, _>(RequestKind::Request, TracingBehavior)
//!         .build();
//!
//!     assert_eq!(mediator.send(Echo(7)).await?, 7);
//!     Ok(())
//! }
//! ```

pub mod behaviors;
pub mod builder;
pub mod mediator;
pub mod pipeline;
pub mod publisher;
pub mod registry;
pub mod sender;

pub use flux_core as core;

pub use behaviors::{NotificationTracingBehavior, TracingBehavior};
pub use builder::MediatorBuilder;
pub use mediator::Mediator;
pub use publisher::Publisher;
pub use registry::{Registry, RegistryStats, ScopeOrder};
pub use sender::Sender;

// Re-export the contract surface so most applications depend on this crate
// alone.
pub use flux_core::{
    AnyNotification, AnyRequest, BoxError, CancellationToken, Next, Notification,
    NotificationBehavior, NotificationHandler, PipelineBehavior, PublishError, PublishOutcome,
    PublishResult, RegistryError, RegistryResult, Request, RequestBehavior, RequestHandler,
    RequestKind, SendError, SendResult,
};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use flux::prelude::*;
/// ```
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::behaviors::{NotificationTracingBehavior, TracingBehavior};
    pub use crate::builder::MediatorBuilder;
    pub use crate::mediator::Mediator;
    pub use crate::publisher::Publisher;
    pub use crate::registry::ScopeOrder;
    pub use crate::sender::Sender;

    pub use flux_core::{
        BoxError, CancellationToken, Next, Notification, NotificationBehavior,
        NotificationHandler, PipelineBehavior, PublishError, PublishOutcome, PublishResult,
        Request, RequestBehavior, RequestHandler, RequestKind, SendError, SendResult,
    };
}
