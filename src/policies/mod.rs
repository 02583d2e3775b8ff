//! Dispatch policies.
//!
//! ## Contents
//! - [`FailurePolicy`] what a publish does when a handler fails (isolate / propagate)
//!
//! ## Quick wiring
//! ```text
//! ChannelConfig { failure: FailurePolicy, .. }
//!      └─► channel::core::EventChannel::publish uses:
//!           - failure.aborts() to decide continue/return after a failed handler
//! ```
//!
//! ## Defaults
//! - `FailurePolicy::Isolate` (one broken listener never silences the others).

mod failure;

pub use failure::FailurePolicy;
