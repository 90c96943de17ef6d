//! Chain composition for dispatch pipelines.
//!
//! [`compose`] turns a terminal invocation and an ordered list of behavior
//! layers into one nested [`Next`] chain. Registration order is
//! outermost-first: the first layer observes the call before any other layer
//! and observes the result after every other layer has returned. Building
//! back-to-front achieves this, since each wrap captures the previous (inner)
//! step as its continuation.

use flux_core::Next;
use futures::future::BoxFuture;

/// One behavior, bound to its per-dispatch state and reduced to a function
/// from "the rest of the chain" to the layered invocation.
pub type Layer<Res> = Box<dyn FnOnce(Next<Res>) -> BoxFuture<'static, Res> + Send>;

/// Composes `layers` around `terminal` into a single invocation chain.
///
/// An empty layer list yields the terminal invocation unchanged. Whether an
/// inner step runs at all remains each layer's choice; composition only
/// nests, it never forces sequencing.
pub fn compose<Res: Send + 'static>(terminal: Next<Res>, layers: Vec<Layer<Res>>) -> Next<Res> {
    let mut next = terminal;
    for layer in layers.into_iter().rev() {
        let inner = next;
        next = Next::new(move || layer(inner));
    }
    next
}
