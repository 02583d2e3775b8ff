//! # Per-channel configuration.
//!
//! Provides [`ChannelConfig`], the settings an [`EventChannel`](crate::EventChannel)
//! is created with.
//!
//! Config is used in two ways:
//! 1. **Direct creation**: `EventChannel::with_config(config)`
//! 2. **Hub defaults**: `HubConfig::channel` is cloned for every lazily created channel
//!
//! ## Sentinel values
//! - `name = None` → the payload's type name
//! - `capacity = 0` → no preallocation

use std::borrow::Cow;

use crate::policies::FailurePolicy;

/// Settings for a single event channel.
///
/// ## Field semantics
/// - `name`: Label used in logs and [`DispatchError`](crate::DispatchError)
/// - `failure`: What publish does when a handler fails
/// - `capacity`: Initial room in the registration list (`0` = none)
#[derive(Clone, Debug, Default)]
pub struct ChannelConfig {
    /// Channel label. `None` falls back to `std::any::type_name::<T>()`.
    pub name: Option<Cow<'static, str>>,

    /// Handler failure policy.
    pub failure: FailurePolicy,

    /// Expected number of registrations.
    pub capacity: usize,
}

impl ChannelConfig {
    /// Sets the channel label.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the failure policy.
    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    /// Sets the preallocated registration capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Resolves the label, falling back to the payload's type name.
    pub(crate) fn resolved_name<T>(&self) -> Cow<'static, str> {
        self.name
            .clone()
            .unwrap_or(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Returns the capacity hint as an `Option`.
    ///
    /// - `None` → no preallocation
    /// - `Some(n)` → reserve room for `n` registrations
    #[inline]
    pub fn capacity_hint(&self) -> Option<usize> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.capacity)
        }
    }
}
