//! # Hub: explicitly owned set of channels keyed by payload type.
//!
//! For code that wants "one channel per event type, reachable from anywhere"
//! without a hidden global. The hub is constructed by the application, shared
//! by `Arc`, and torn down with [`Hub::shutdown`].
//!
//! ## Lifecycle
//! ```text
//! Hub::new(cfg) ──► install::<T>(cfg) / channel::<T>() ──► ... ──► shutdown()
//!                     (explicit)          (lazy, HubConfig)          (clears every
//!                                                                     channel, empties hub)
//! ```
//!
//! ## Rules
//! - At most one channel per payload type
//! - `channel::<T>()` returns clones of the same channel on every call
//! - After `shutdown()` existing channel clones stay usable but have no
//!   registrations; the next `channel::<T>()` creates a fresh channel
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use evchannel::{Hub, HubConfig};
//!
//! #[derive(Debug)]
//! struct EnemySpawned { kind: &'static str }
//!
//! let hub = Arc::new(Hub::new(HubConfig::default()));
//! let spawned = hub.channel::<EnemySpawned>();
//! spawned.subscribe_fn("radar", |ev| { let _ = ev.kind; Ok(()) });
//!
//! assert_eq!(hub.channel::<EnemySpawned>().len(), 1);
//! assert_eq!(hub.shutdown(), 1);
//! assert!(spawned.is_empty());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::channel::{ChannelConfig, EventChannel};
use crate::error::HubError;

/// Defaults applied to channels the hub creates lazily.
#[derive(Clone, Debug, Default)]
pub struct HubConfig {
    /// Template for [`Hub::channel`]. A `None` name becomes the payload type name.
    pub channel: ChannelConfig,
}

/// Type-erased view of a channel stored in the hub.
trait ErasedChannel: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clear(&self) -> usize;
    fn name(&self) -> &str;
}

impl<T: 'static> ErasedChannel for EventChannel<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clear(&self) -> usize {
        EventChannel::clear(self)
    }

    fn name(&self) -> &str {
        EventChannel::name(self)
    }
}

fn downcast<T: 'static>(slot: Option<&dyn ErasedChannel>) -> Option<EventChannel<T>> {
    slot.and_then(|c| c.as_any().downcast_ref::<EventChannel<T>>())
        .cloned()
}

/// Registry of channels, one per payload type.
pub struct Hub {
    cfg: HubConfig,
    channels: RwLock<HashMap<TypeId, Box<dyn ErasedChannel>>>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl Hub {
    /// Creates an empty hub.
    pub fn new(cfg: HubConfig) -> Self {
        Self {
            cfg,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the channel for `T`, creating it from [`HubConfig::channel`] if needed.
    pub fn channel<T: 'static>(&self) -> EventChannel<T> {
        let key = TypeId::of::<T>();
        if let Some(ch) = downcast::<T>(self.channels.read().get(&key).map(|b| &**b)) {
            return ch;
        }

        let mut map = self.channels.write();
        if let Some(ch) = downcast::<T>(map.get(&key).map(|b| &**b)) {
            return ch;
        }
        let ch = EventChannel::<T>::with_config(self.cfg.channel.clone());
        tracing::debug!(channel = ch.name(), "hub: channel created");
        map.insert(key, Box::new(ch.clone()));
        ch
    }

    /// Creates the channel for `T` with an explicit configuration.
    ///
    /// ### Errors
    /// [`HubError::AlreadyInstalled`] if a channel for `T` exists already
    /// (including one created lazily by [`channel`](Self::channel)).
    pub fn install<T: 'static>(&self, cfg: ChannelConfig) -> Result<EventChannel<T>, HubError> {
        let key = TypeId::of::<T>();
        let mut map = self.channels.write();
        if map.contains_key(&key) {
            return Err(HubError::AlreadyInstalled {
                type_name: std::any::type_name::<T>(),
            });
        }
        let ch = EventChannel::<T>::with_config(cfg);
        tracing::debug!(channel = ch.name(), "hub: channel installed");
        map.insert(key, Box::new(ch.clone()));
        Ok(ch)
    }

    /// Detaches the channel for `T` from the hub. Its registrations are kept;
    /// existing clones keep working.
    pub fn remove<T: 'static>(&self) -> bool {
        // Map lock is released at the end of this statement; the channel is
        // dropped after it, so handler destructors may call back into the hub.
        let gone = self.channels.write().remove(&TypeId::of::<T>());
        gone.is_some()
    }

    /// True if a channel for `T` exists.
    pub fn contains<T: 'static>(&self) -> bool {
        self.channels.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    /// True if the hub holds no channels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Teardown: clears every channel's registrations and empties the hub.
    ///
    /// Returns the number of channels torn down. Safe to call repeatedly.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<_> = self.channels.write().drain().map(|(_, ch)| ch).collect();
        for ch in &drained {
            let removed = ch.clear();
            tracing::debug!(channel = ch.name(), removed, "hub: channel torn down");
        }
        drained.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::FailurePolicy;

    struct Jumped;
    struct Landed;

    #[test]
    fn test_channel_is_created_once_per_type() {
        let hub = Hub::default();
        let a = hub.channel::<Jumped>();
        let b = hub.channel::<Jumped>();
        let c = hub.channel::<Landed>();

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(hub.len(), 2);
    }

    #[test]
    fn test_install_rejects_duplicates() {
        let hub = Hub::default();
        let ch = hub
            .install::<Jumped>(ChannelConfig::default().with_failure(FailurePolicy::Propagate))
            .unwrap();
        assert_eq!(ch.config().failure, FailurePolicy::Propagate);
        assert_eq!(hub.channel::<Jumped>().id(), ch.id());

        let err = hub.install::<Jumped>(ChannelConfig::default()).unwrap_err();
        assert!(matches!(err, HubError::AlreadyInstalled { .. }));
    }

    #[test]
    fn test_lazy_channels_use_hub_defaults() {
        let hub = Hub::new(HubConfig {
            channel: ChannelConfig::default().with_failure(FailurePolicy::Propagate),
        });
        let ch = hub.channel::<Landed>();
        assert!(ch.config().failure.aborts());
        assert!(ch.name().ends_with("Landed"));
    }

    #[test]
    fn test_shutdown_clears_and_is_repeatable() {
        let hub = Hub::default();
        let ch = hub.channel::<Jumped>();
        ch.subscribe_fn("a", |_| Ok(()));
        ch.subscribe_fn("b", |_| Ok(()));

        assert_eq!(hub.shutdown(), 1);
        assert!(ch.is_empty());
        assert!(hub.is_empty());
        assert_eq!(hub.shutdown(), 0);

        let fresh = hub.channel::<Jumped>();
        assert_ne!(fresh.id(), ch.id());
    }

    #[test]
    fn test_remove_detaches_without_clearing() {
        let hub = Hub::default();
        let ch = hub.channel::<Jumped>();
        ch.subscribe_fn("a", |_| Ok(()));

        assert!(hub.remove::<Jumped>());
        assert!(!hub.remove::<Jumped>());
        assert!(!hub.contains::<Jumped>());
        assert_eq!(ch.len(), 1);
    }
}
