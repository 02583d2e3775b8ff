//! # Subscription tokens and scoped guards.
//!
//! Every registration hands its owner the right to undo it:
//!
//! - [`SubscriptionToken`]: a plain `Copy` id. The owner must call
//!   [`EventChannel::unsubscribe`](crate::EventChannel::unsubscribe) itself;
//!   forgetting to do so leaves the handler registered.
//! - [`Subscription`]: a guard that unsubscribes when dropped. It holds the
//!   channel weakly, so it never keeps a channel alive.
//!
//! ```text
//! subscribe(h)        ──► SubscriptionToken ──► unsubscribe(token)   (manual)
//! subscribe_scoped(h) ──► Subscription      ──► drop(guard)          (automatic)
//!                                           └─► guard.detach()       (back to manual)
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Weak;

use crate::channel::core::Shared;

/// Global counter for channel identities.
static CHANNEL_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`EventChannel`](crate::EventChannel).
///
/// Clones of a channel share the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    pub(crate) fn next() -> Self {
        ChannelId(CHANNEL_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch#{}", self.0)
    }
}

/// Identifies one registration on one channel.
///
/// Tokens are only meaningful for the channel that issued them; passing one to
/// another channel is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    pub(crate) channel: ChannelId,
    pub(crate) id: u64,
}

impl SubscriptionToken {
    /// Channel that issued this token.
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Registration id, unique within the issuing channel.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Scoped registration: unsubscribes on drop.
///
/// Obtained from [`EventChannel::subscribe_scoped`](crate::EventChannel::subscribe_scoped).
/// Store it in the subscriber; when the subscriber is destroyed the handler
/// goes away with it.
#[must_use = "dropping a Subscription immediately unsubscribes the handler"]
pub struct Subscription<T: 'static> {
    channel: Weak<Shared<T>>,
    token: Option<SubscriptionToken>,
}

impl<T: 'static> Subscription<T> {
    pub(crate) fn new(channel: Weak<Shared<T>>, token: SubscriptionToken) -> Self {
        Self {
            channel,
            token: Some(token),
        }
    }

    /// Token of the guarded registration, or `None` after [`cancel`](Self::cancel).
    pub fn token(&self) -> Option<SubscriptionToken> {
        self.token
    }

    /// True while the registration is still present on a live channel.
    pub fn is_active(&self) -> bool {
        match (self.token, self.channel.upgrade()) {
            (Some(token), Some(shared)) => shared.contains(token),
            _ => false,
        }
    }

    /// Unsubscribes now. Returns `true` if a registration was removed.
    ///
    /// Calling it again (or dropping the guard afterwards) is a no-op.
    pub fn cancel(&mut self) -> bool {
        let Some(token) = self.token.take() else {
            return false;
        };
        match self.channel.upgrade() {
            Some(shared) => shared.remove(token),
            None => false,
        }
    }

    /// Gives up the guard without unsubscribing and returns the token.
    ///
    /// The caller is responsible for unsubscribing from here on.
    pub fn detach(mut self) -> Option<SubscriptionToken> {
        self.token.take()
    }
}

impl<T: 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T: 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ids_are_unique_and_printable() {
        let a = ChannelId::next();
        let b = ChannelId::next();

        assert!(b.get() > a.get());
        assert_eq!(a.to_string(), format!("ch#{}", a.get()));
    }
}
