//! # Failure policy for handler dispatch.
//!
//! [`FailurePolicy`] decides what [`EventChannel::publish`](crate::EventChannel::publish)
//! does when a handler returns an error or panics.
//!
//! - [`FailurePolicy::Isolate`] log the failure, record it, keep going (default).
//! - [`FailurePolicy::Propagate`] stop at the first failure and return it.
//!
//! ## Choosing the right policy
//!
//! **Independent listeners** (UI, audio, stats):
//! ```text
//! FailurePolicy::Isolate    → A fails → warn! + report → B, C still run
//! ```
//!
//! **Chained listeners** (later handlers assume earlier ones succeeded):
//! ```text
//! FailurePolicy::Propagate  → A fails → Err(DispatchError::Aborted) → B, C skipped
//! ```
//!
//! Panics are caught under both policies and reported as
//! [`HandlerError::Panicked`](crate::HandlerError::Panicked).

/// Policy controlling how a publish reacts to a failing handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and continue with the remaining handlers (default).
    #[default]
    Isolate,
    /// Abort the dispatch at the first failure and return it to the publisher.
    Propagate,
}

impl FailurePolicy {
    /// True if a failure must stop the dispatch.
    #[inline]
    pub fn aborts(&self) -> bool {
        matches!(self, FailurePolicy::Propagate)
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailurePolicy::Isolate => "isolate",
            FailurePolicy::Propagate => "propagate",
        }
    }
}
