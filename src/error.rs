//! Error types used by event channels, handlers and the hub.
//!
//! This module defines three enums:
//!
//! - [`HandlerError`]: failure reported by a single handler invocation.
//! - [`DispatchError`]: a publish aborted under [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate).
//! - [`HubError`]: misuse of the shared [`Hub`](crate::Hub) registry.
//!
//! Publishing with no subscribers and unsubscribing an unknown token are **not**
//! errors and have no variant here.
//!
//! All types provide `as_label` for logs/metrics.

use thiserror::Error;

/// # Failure reported by a handler.
///
/// Returned from [`Handle::on_event`](crate::Handle::on_event), or synthesized by
/// the channel when a handler panics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Handler rejected or failed to process the event.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler panicked; the panic was caught by the channel.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Fail`].
    ///
    /// # Example
    /// ```
    /// use evchannel::HandlerError;
    ///
    /// let err = HandlerError::fail("scoreboard offline");
    /// assert_eq!(err.to_string(), "handler failed: scoreboard offline");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// True if the failure came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked { .. })
    }
}

/// # Errors produced by [`EventChannel::publish`](crate::EventChannel::publish).
///
/// Only raised under [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate);
/// with the default `Isolate` policy failures are collected in the
/// [`DispatchReport`](crate::DispatchReport) instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A handler failed and the remaining handlers were skipped.
    #[error("dispatch on '{channel}' aborted at handler #{position} '{handler}': {source}")]
    Aborted {
        /// Name of the channel being published on.
        channel: String,
        /// Name of the failing handler.
        handler: String,
        /// Zero-based position of the failing handler in the dispatch snapshot.
        position: usize,
        /// What the handler reported.
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evchannel::{DispatchError, HandlerError};
    ///
    /// let err = DispatchError::Aborted {
    ///     channel: "player_died".into(),
    ///     handler: "scoreboard".into(),
    ///     position: 0,
    ///     source: HandlerError::fail("boom"),
    /// };
    /// assert_eq!(err.as_label(), "dispatch_aborted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Aborted { .. } => "dispatch_aborted",
        }
    }

    /// The handler failure that caused the abort.
    pub fn cause(&self) -> &HandlerError {
        match self {
            DispatchError::Aborted { source, .. } => source,
        }
    }
}

/// # Errors produced by the [`Hub`](crate::Hub).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// A channel for this payload type already exists.
    #[error("channel for '{type_name}' is already installed")]
    AlreadyInstalled {
        /// Payload type name.
        type_name: &'static str,
    },
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::AlreadyInstalled { .. } => "hub_already_installed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_aborted_exposes_handler_error_as_source() {
        let err = DispatchError::Aborted {
            channel: "enemy_spawned".into(),
            handler: "radar".into(),
            position: 2,
            source: HandlerError::Panicked {
                info: "index out of bounds".into(),
            },
        };

        assert!(err.cause().is_panic());
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("handler panicked: index out of bounds")
        );
        assert!(err.to_string().contains("#2 'radar'"));
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(HandlerError::fail("x").as_label(), "handler_failed");
        assert_eq!(
            HubError::AlreadyInstalled { type_name: "u32" }.as_label(),
            "hub_already_installed"
        );
    }
}
