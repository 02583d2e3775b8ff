//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(&T) -> Result<(), HandlerError>` together
//! with a name used in logs and failure reports.
//!
//! Closures are `Fn`, not `FnMut`: shared state goes through `Arc<...>` with
//! atomics or a lock, captured explicitly.
//!
//! ## Example
//! ```rust
//! use evchannel::{Handle, HandlerError, HandlerFn};
//!
//! let h = HandlerFn::new("printer", |hp: &i32| {
//!     println!("hp = {hp}");
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(Handle::<i32>::name(&h), "printer");
//! assert!(h.on_event(&10_i32).is_ok());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::handlers::handler::Handle;

/// Function-backed handler implementation.
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a shared handle, or
    /// [`EventChannel::subscribe_fn`](crate::EventChannel::subscribe_fn) which
    /// also infers the closure's argument type.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and wraps it in an `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").field("name", &self.name).finish()
    }
}

impl<T, F> Handle<T> for HandlerFn<F>
where
    F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static, // Fn, not FnMut
{
    fn on_event(&self, event: &T) -> Result<(), HandlerError> {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
