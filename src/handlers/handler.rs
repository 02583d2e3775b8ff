//! # Core handler trait
//!
//! `Handle<T>` is the extension point for plugging callbacks into an
//! [`EventChannel<T>`](crate::EventChannel). Handlers run **synchronously** on the
//! publisher's thread, one after another, in registration order.
//!
//! ## Contract
//! - Keep `on_event` short: a slow handler delays every handler behind it and
//!   the publisher itself.
//! - Return `Err` to report a failure; the channel's
//!   [`FailurePolicy`](crate::FailurePolicy) decides whether dispatch continues.
//! - Panics are caught by the channel and reported as
//!   [`HandlerError::Panicked`].
//! - State mutated from `on_event` needs interior mutability (`Cell` is not
//!   enough, handlers are `Sync`; use atomics or a mutex).
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use evchannel::{Handle, HandlerError};
//!
//! struct Kills(AtomicU32);
//!
//! impl Handle<u32> for Kills {
//!     fn on_event(&self, _enemy_id: &u32) -> Result<(), HandlerError> {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     }
//!     fn name(&self) -> &str { "kills" }
//! }
//! ```

use std::sync::Arc;

use crate::error::HandlerError;

/// Contract for event handlers.
///
/// Called from [`EventChannel::publish`](crate::EventChannel::publish) on the
/// publisher's thread.
pub trait Handle<T>: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the payload (does not transfer ownership)
    fn on_event(&self, event: &T) -> Result<(), HandlerError>;

    /// Human-readable name (for logs and failure reports).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a handler object.
pub type HandlerRef<T> = Arc<dyn Handle<T>>;
