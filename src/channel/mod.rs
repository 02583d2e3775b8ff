//! Event channels: registration list, dispatch and subscription lifecycle.
//!
//! ## Contents
//! - [`EventChannel`] typed registry of handlers with ordered multicast `publish`
//! - [`ChannelConfig`] name, failure policy and capacity hint
//! - [`SubscriptionToken`], [`Subscription`] manual and scoped unregister rights
//! - [`DispatchReport`], [`HandlerFailure`] outcome of one publish
//!
//! ## Quick reference
//! - **Producers** hold a clone of the channel and call `publish(&payload)`.
//! - **Consumers** call `subscribe*` and keep the token or guard for as long as
//!   they want to hear about events.

mod config;
pub(crate) mod core;
mod registry;
mod report;
mod subscription;

pub use config::ChannelConfig;
pub use self::core::EventChannel;
pub use report::{DispatchReport, HandlerFailure};
pub use subscription::{ChannelId, Subscription, SubscriptionToken};
