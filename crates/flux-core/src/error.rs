//! Unified error types for the Flux mediator.
//!
//! This module provides standardized error types used across the dispatch
//! engine. Failures of the dispatched operation itself are not represented
//! here: request handlers carry them inside the request's declared response
//! type, and notification handlers surface them as a [`BoxError`] which is
//! passed back to the caller without translation.

use thiserror::Error;

/// A type-erased error, used by notification handlers and behaviors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of one step of a notification pipeline.
pub type PublishOutcome = Result<(), BoxError>;

// =============================================================================
// Send Errors
// =============================================================================

/// Errors surfaced by request dispatch.
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// No handler registered for the request type.
    ///
    /// A caller configuration error; never retried.
    #[error("no handler registered for request '{request}'")]
    HandlerNotFound {
        /// Type name of the unresolved request.
        request: &'static str,
    },
}

// =============================================================================
// Publish Errors
// =============================================================================

/// Errors surfaced by notification dispatch.
#[derive(Debug, Error)]
pub enum PublishError {
    /// No subscriber registered for the notification type.
    ///
    /// Notifications are not optional-delivery: every published notification
    /// type must have at least one subscriber.
    #[error("no handler registered for notification '{notification}'")]
    HandlerNotFound {
        /// Type name of the unresolved notification.
        notification: &'static str,
    },

    /// A subscriber or behavior in the pipeline failed.
    ///
    /// The original error is carried by value and remains downcastable.
    #[error("{0}")]
    Handler(BoxError),
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors raised at registration time, before any dispatch occurs.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A handler is already bound to this request type.
    ///
    /// Exactly one handler may be registered per request type.
    #[error("handler already registered for request '{request}'")]
    DuplicateHandler {
        /// Type name of the doubly-bound request.
        request: &'static str,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for request dispatch.
pub type SendResult<T> = Result<T, SendError>;

/// Result type for notification dispatch.
pub type PublishResult = Result<(), PublishError>;

/// Result type for registration operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
