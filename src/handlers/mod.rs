//! # Event handlers.
//!
//! This module provides the [`Handle`] trait, the closure adapter [`HandlerFn`]
//! and built-in implementations for reacting to payloads published on an
//! [`EventChannel`](crate::EventChannel).
//!
//! ## Architecture
//! ```text
//! Producer ── publish(&T) ──► EventChannel<T> ──► snapshot of registrations
//!                                                     │  (registration order)
//!                                                     ├──► handler #0 .on_event(&T)
//!                                                     ├──► handler #1 .on_event(&T)
//!                                                     └──► handler #N .on_event(&T)
//! ```
//!
//! ## Handler types
//! - **Passive handlers** - observe and react (logging, sound cues, UI refresh)
//! - **Stateful handlers** - keep counters or caches updated from events (a scoreboard)

#[cfg(feature = "logging")]
mod embedded;
mod handler;
mod handler_fn;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use handler::{Handle, HandlerRef};
pub use handler_fn::HandlerFn;
