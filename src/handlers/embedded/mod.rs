//! # Built-in handlers
//!
//! Small, self-contained implementations useful for demos and debugging.
//!
//! - [`LogWriter`]: traces payloads in a human-readable form.

mod log;

pub use log::LogWriter;
