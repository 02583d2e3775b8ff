//! # LogWriter: simple event tracer
//!
//! A minimal handler that records every payload it receives through
//! [`tracing`]. Use it for tests or demos.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO evchannel::handlers::embedded::log: event channel="player_died" event=Player { name: "hero", deaths: 1 }
//! ```

use std::borrow::Cow;
use std::fmt::Debug;

use crate::error::HandlerError;
use crate::handlers::Handle;

/// Event writer handler.
#[derive(Debug, Clone)]
pub struct LogWriter {
    label: Cow<'static, str>,
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter {
    /// Construct a new [`LogWriter`] with the label `"evchannel"`.
    #[must_use]
    pub fn new() -> Self {
        Self::labeled("evchannel")
    }

    /// Construct a writer that tags every record with `label`
    /// (typically the channel name).
    #[must_use]
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label attached to every record.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T: Debug> Handle<T> for LogWriter {
    fn on_event(&self, event: &T) -> Result<(), HandlerError> {
        tracing::info!(channel = %self.label, event = ?event, "event");
        Ok(())
    }

    fn name(&self) -> &str {
        "LogWriter"
    }
}
