//! Request types for the Flux mediator.
//!
//! This module provides the request side of the contract surface:
//!
//! - [`Request`] - Base trait for all dispatchable requests
//! - [`RequestKind`] - Kind classification (request, command, query)
//! - [`AnyRequest`] - Type-erased request view for scope-generic behaviors
//!
//! # Kind Classification
//!
//! A request declares its kind through [`Request::KIND`]. Kinds are a
//! classification, not a hierarchy: a command-kind request is still a request,
//! and during pipeline assembly both the generic request scope and the
//! command scope are consulted for it.
//!
//! ```rust,ignore
//! use flux_core::{Request, RequestKind};
//!
//! struct CreateOrder {
//!     sku: String,
//! }
//!
//! impl Request for CreateOrder {
//!     type Response = Result<u64, OrderError>;
//!     const KIND: RequestKind = RequestKind::Command;
//! }
//! ```

use std::any::Any;
use std::fmt;

// ============================================================================
// Kind Classification
// ============================================================================

/// Classification of request kinds.
///
/// The kind of a request selects which kind-scoped pipeline behaviors
/// participate in its dispatch, in addition to the exact-type and generic
/// scopes that apply to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// A plain request with no further classification.
    Request,
    /// A state-changing operation.
    Command,
    /// A read-only operation.
    Query,
}

impl RequestKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Request => "request",
            RequestKind::Command => "command",
            RequestKind::Query => "query",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Core Request Trait
// ============================================================================

/// The base trait for all requests dispatched through the mediator.
///
/// A request is a plain value carrying no behavior. It declares the type of
/// the response its handler produces and, optionally, a kind classification.
/// Exactly one handler is bound to each request type; failures of the
/// operation itself travel inside [`Response`](Request::Response) (typically
/// a `Result`), never through the dispatch engine.
///
/// # Example
///
/// ```rust,ignore
/// struct Echo(i32);
///
/// impl Request for Echo {
///     type Response = i32;
/// }
/// ```
pub trait Request: Send + Sync + 'static {
    /// The response type produced by this request's handler.
    type Response: Send + 'static;

    /// The kind classification of this request.
    ///
    /// Defaults to [`RequestKind::Request`]. Command- and query-kind requests
    /// additionally match the command/query behavior scopes.
    const KIND: RequestKind = RequestKind::Request;
}

// ============================================================================
// Type-Erased Request View
// ============================================================================

/// A type-erased view of a request travelling through the pipeline.
///
/// Scope-generic pipeline behaviors observe requests through this trait
/// rather than the concrete type. The view exposes the runtime type name,
/// the kind classification, and downcasting via [`as_any`](AnyRequest::as_any)
/// for behaviors that need concrete access.
///
/// Implemented for every [`Request`] type by a blanket implementation.
///
/// # Example
///
/// ```rust,ignore
/// fn inspect(request: &dyn AnyRequest) {
///     if let Some(echo) = request.as_any().downcast_ref::<Echo>() {
///         println!("echoing {}", echo.0);
///     }
/// }
/// ```
pub trait AnyRequest: Send + Sync {
    /// Returns the full type name of the concrete request.
    fn name(&self) -> &'static str;

    /// Returns the kind classification of the concrete request.
    fn kind(&self) -> RequestKind;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<R: Request> AnyRequest for R {
    fn name(&self) -> &'static str {
        std::any::type_name::<R>()
    }

    fn kind(&self) -> RequestKind {
        R::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Request for Ping {
        type Response = ();
    }

    struct Reindex;

    impl Request for Reindex {
        type Response = u64;
        const KIND: RequestKind = RequestKind::Command;
    }

    #[test]
    fn kind_defaults_to_plain_request() {
        assert_eq!(Ping::KIND, RequestKind::Request);
        assert_eq!(Reindex::KIND, RequestKind::Command);
    }

    #[test]
    fn erased_view_reports_name_and_kind() {
        let request = Reindex;
        let erased: &dyn AnyRequest = &request;
        assert!(erased.name().ends_with("Reindex"));
        assert_eq!(erased.kind(), RequestKind::Command);
    }

    #[test]
    fn erased_view_downcasts_to_concrete_type() {
        let request = Ping;
        let erased: &dyn AnyRequest = &request;
        assert!(erased.as_any().downcast_ref::<Ping>().is_some());
        assert!(erased.as_any().downcast_ref::<Reindex>().is_none());
    }

    #[test]
    fn kind_display_is_lowercase() {
        assert_eq!(RequestKind::Query.to_string(), "query");
    }
}
