//! # Outcome of a single publish.

use crate::error::HandlerError;

/// A handler that failed during a publish under
/// [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Handler name as reported by [`Handle::name`](crate::Handle::name).
    pub handler: String,
    /// Zero-based position in the dispatch snapshot.
    pub position: usize,
    /// What went wrong.
    pub error: HandlerError,
}

/// Summary returned by [`EventChannel::publish`](crate::EventChannel::publish).
///
/// ### Fields
/// - `delivered`: handlers that returned `Ok`
/// - `failures`: handlers that returned `Err` or panicked (in dispatch order)
/// - `pruned`: weak registrations found dead and removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failures: Vec<HandlerFailure>,
    pub pruned: usize,
}

impl DispatchReport {
    /// True if no handler failed.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of handlers actually called (successful or not).
    #[inline]
    pub fn invoked(&self) -> usize {
        self.delivered + self.failures.len()
    }
}
