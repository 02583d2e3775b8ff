//! # EventChannel: ordered synchronous multicast.
//!
//! [`EventChannel<T>`] keeps an ordered list of handlers and invokes all of them,
//! on the caller's thread, whenever a payload is published.
//!
//! ## Rules
//! - **Registration order**: handlers run in the order they were subscribed
//! - **Duplicates allowed**: the same handler subscribed twice runs twice
//! - **Empty publish**: no handlers → empty [`DispatchReport`], never an error
//! - **Idempotent unsubscribe**: unknown or already-removed tokens are ignored
//! - **Snapshot dispatch**: a publish iterates the list as it was when the
//!   publish started; handlers may subscribe, unsubscribe or publish again
//!   from inside `on_event` without deadlocking
//!
//! ## Failure handling
//! ```text
//! publish(&T)
//!   for each handler in snapshot:
//!     ├─ weak target gone ─► skip, prune after the loop
//!     ├─ Ok               ─► delivered += 1
//!     └─ Err / panic
//!          ├─ FailurePolicy::Isolate   ─► warn!, record HandlerFailure, continue
//!          └─ FailurePolicy::Propagate ─► return Err(DispatchError::Aborted)
//! ```
//!
//! **Warning**: panics are caught with `AssertUnwindSafe`; a handler that panics
//! while holding a lock may leave its own state inconsistent.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::channel::config::ChannelConfig;
use crate::channel::registry::{Registry, Target};
use crate::channel::report::{DispatchReport, HandlerFailure};
use crate::channel::subscription::{ChannelId, Subscription, SubscriptionToken};
use crate::error::{DispatchError, HandlerError};
use crate::handlers::{Handle, HandlerFn, HandlerRef};

/// State shared by all clones of a channel (and weakly by its guards).
pub(crate) struct Shared<T> {
    id: ChannelId,
    name: Cow<'static, str>,
    cfg: ChannelConfig,
    registry: Registry<T>,
}

impl<T> Shared<T> {
    fn token(&self, id: u64) -> SubscriptionToken {
        SubscriptionToken {
            channel: self.id,
            id,
        }
    }

    fn register(&self, target: Target<T>, handler: &str) -> SubscriptionToken {
        let token = self.token(self.registry.insert(target));
        tracing::debug!(
            channel = %self.name,
            channel_id = %token.channel,
            id = token.id,
            handler,
            "subscribed"
        );
        token
    }

    pub(crate) fn remove(&self, token: SubscriptionToken) -> bool {
        if token.channel != self.id {
            return false;
        }
        let removed = self.registry.remove(token.id);
        if removed {
            tracing::debug!(channel = %self.name, id = token.id, "unsubscribed");
        }
        removed
    }

    pub(crate) fn contains(&self, token: SubscriptionToken) -> bool {
        token.channel == self.id && self.registry.contains(token.id)
    }
}

/// Typed event channel.
///
/// Cloning is cheap and yields a handle to the **same** registration list, so a
/// channel can be handed to producers and consumers by value.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use evchannel::{EventChannel, HandlerError};
///
/// #[derive(Debug)]
/// struct PlayerDied { name: &'static str }
///
/// let deaths: EventChannel<PlayerDied> = EventChannel::named("player_died");
/// let score = Arc::new(AtomicU32::new(0));
///
/// let s = Arc::clone(&score);
/// let token = deaths.subscribe_fn("scoreboard", move |_ev| {
///     s.fetch_add(1, Ordering::Relaxed);
///     Ok(())
/// });
///
/// let report = deaths.publish(&PlayerDied { name: "hero" }).unwrap();
/// assert_eq!(report.delivered, 1);
///
/// deaths.unsubscribe(token);
/// deaths.unsubscribe(token); // no-op
/// deaths.publish(&PlayerDied { name: "hero" }).unwrap();
/// assert_eq!(score.load(Ordering::Relaxed), 1);
/// ```
pub struct EventChannel<T: 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: 'static> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("id", &self.shared.id)
            .field("name", &self.shared.name)
            .field("failure", &self.shared.cfg.failure)
            .field("handlers", &self.len())
            .finish()
    }
}

impl<T: 'static> EventChannel<T> {
    /// Creates a channel with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ChannelConfig::default())
    }

    /// Creates a channel with a label and otherwise default configuration.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_config(ChannelConfig::default().with_name(name))
    }

    /// Creates a channel from an explicit configuration.
    pub fn with_config(cfg: ChannelConfig) -> Self {
        let name = cfg.resolved_name::<T>();
        let registry = Registry::with_capacity(cfg.capacity_hint().unwrap_or(0));
        Self {
            shared: Arc::new(Shared {
                id: ChannelId::next(),
                name,
                cfg,
                registry,
            }),
        }
    }

    /// Channel identity (shared by clones).
    pub fn id(&self) -> ChannelId {
        self.shared.id
    }

    /// Channel label.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Configuration the channel was created with.
    pub fn config(&self) -> &ChannelConfig {
        &self.shared.cfg
    }

    /// Appends a handler to the registration list.
    ///
    /// No uniqueness check: subscribing the same handler twice makes it run
    /// twice per publish. The channel keeps the handler alive until the token
    /// is passed to [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, handler: HandlerRef<T>) -> SubscriptionToken {
        let name = handler.name().to_owned();
        self.shared.register(Target::Strong(handler), &name)
    }

    /// Subscribes a closure under the given name.
    pub fn subscribe_fn<F>(&self, name: impl Into<Cow<'static, str>>, f: F) -> SubscriptionToken
    where
        F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe(HandlerFn::arc(name, f))
    }

    /// Subscribes and returns a guard that unsubscribes on drop.
    pub fn subscribe_scoped(&self, handler: HandlerRef<T>) -> Subscription<T> {
        let token = self.subscribe(handler);
        Subscription::new(Arc::downgrade(&self.shared), token)
    }

    /// Subscribes without taking ownership of the handler.
    ///
    /// The channel holds a `Weak`; once the last `Arc` to `handler` is dropped
    /// the registration is skipped and pruned by the next publish (or by
    /// [`prune`](Self::prune)).
    pub fn subscribe_weak<H: Handle<T>>(&self, handler: &Arc<H>) -> SubscriptionToken {
        let erased: HandlerRef<T> = Arc::clone(handler) as HandlerRef<T>;
        let weak = Arc::downgrade(&erased);
        self.shared.register(Target::Weak(weak), handler.name())
    }

    /// Removes the registration behind `token`.
    ///
    /// Returns `true` if something was removed. Unknown, already-removed or
    /// foreign-channel tokens are ignored and return `false`.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.shared.remove(token)
    }

    /// True if `token` refers to a registration currently on this channel.
    pub fn contains(&self, token: SubscriptionToken) -> bool {
        self.shared.contains(token)
    }

    /// Number of registrations.
    ///
    /// Weak registrations whose handler is gone are counted until pruned.
    pub fn len(&self) -> usize {
        self.shared.registry.len()
    }

    /// True if there are no registrations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops weak registrations whose handler no longer exists.
    pub fn prune(&self) -> usize {
        let pruned = self.shared.registry.prune_all();
        if pruned > 0 {
            tracing::debug!(channel = %self.shared.name, pruned, "pruned dead handlers");
        }
        pruned
    }

    /// Removes every registration. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let n = self.shared.registry.clear();
        tracing::debug!(channel = %self.shared.name, removed = n, "cleared");
        n
    }

    /// Invokes every registered handler with `event`, in registration order.
    ///
    /// ### Errors
    /// Only with [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate):
    /// the first failing handler aborts the dispatch with
    /// [`DispatchError::Aborted`]. Under the default `Isolate` policy this
    /// always returns `Ok` and failures are listed in the report.
    pub fn publish(&self, event: &T) -> Result<DispatchReport, DispatchError> {
        let snapshot = self.shared.registry.snapshot();
        let mut report = DispatchReport::default();
        if snapshot.is_empty() {
            return Ok(report);
        }
        tracing::trace!(channel = %self.shared.name, handlers = snapshot.len(), "publish");

        let mut dead = Vec::new();
        for (position, entry) in snapshot.iter().enumerate() {
            let Some(handler) = entry.resolve() else {
                dead.push(entry.id);
                continue;
            };

            let Err(error) = invoke(handler.as_ref(), event) else {
                report.delivered += 1;
                continue;
            };

            if self.shared.cfg.failure.aborts() {
                self.shared.registry.prune(&dead);
                return Err(DispatchError::Aborted {
                    channel: self.shared.name.to_string(),
                    handler: handler.name().to_owned(),
                    position,
                    source: error,
                });
            }

            tracing::warn!(
                channel = %self.shared.name,
                handler = handler.name(),
                position,
                policy = self.shared.cfg.failure.as_label(),
                label = error.as_label(),
                %error,
                "handler failed; continuing"
            );
            report.failures.push(HandlerFailure {
                handler: handler.name().to_owned(),
                position,
                error,
            });
        }

        report.pruned = self.shared.registry.prune(&dead);
        if report.pruned > 0 {
            tracing::debug!(channel = %self.shared.name, pruned = report.pruned, "pruned dead handlers");
        }
        Ok(report)
    }
}

/// Runs one handler, converting a panic into [`HandlerError::Panicked`].
fn invoke<T: 'static>(handler: &dyn Handle<T>, event: &T) -> Result<(), HandlerError> {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.on_event(event))) {
        Ok(result) => result,
        Err(payload) => Err(HandlerError::Panicked {
            info: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
