//! # evchannel
//!
//! **evchannel** is a small library of typed, synchronous event channels for
//! game-object style code: one object raises an event, any number of decoupled
//! listeners react, and nobody holds a reference to anybody else.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐                               ┌──────────────┐
//!     │   Producer   │                               │  Consumers   │
//!     │ (e.g. Player)│                               │ (Scoreboard, │
//!     └──────┬───────┘                               │  Enemy, ...) │
//!            │ publish(&payload)                     └──────┬───────┘
//!            ▼                                              │ subscribe*/unsubscribe
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventChannel<T>                                                  │
//! │  - ordered registration list (RwLock<Arc<Vec<Entry>>>, COW)       │
//! │  - FailurePolicy (Isolate | Propagate)                            │
//! │  - ChannelId + per-channel registration ids                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   handler #0         handler #1         handler #N      (registration order,
//!   .on_event(&T)      .on_event(&T)      .on_event(&T)    caller's thread)
//! ```
//!
//! ### Subscription lifecycle
//! ```text
//! subscribe(h)        ─► SubscriptionToken ─► unsubscribe(token)   manual; forgetting leaks h
//! subscribe_scoped(h) ─► Subscription      ─► drop(guard)          automatic
//! subscribe_weak(&h)  ─► SubscriptionToken ─► drop(last Arc<h>)    pruned on next publish
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Channels**      | Ordered synchronous multicast of one payload type.            | [`EventChannel`], [`DispatchReport`]      |
//! | **Handlers**      | Objects or closures reacting to payloads.                     | [`Handle`], [`HandlerFn`], [`HandlerRef`] |
//! | **Lifecycle**     | Manual tokens, scoped guards, weak registrations.             | [`SubscriptionToken`], [`Subscription`]   |
//! | **Policies**      | What happens when a handler fails.                            | [`FailurePolicy`]                         |
//! | **Shared access** | Explicitly owned channel-per-type registry.                   | [`Hub`]                                   |
//! | **Errors**        | Typed errors for handlers, dispatch and the hub.              | [`HandlerError`], [`DispatchError`]       |
//! | **Configuration** | Per-channel and hub-wide settings.                            | [`ChannelConfig`], [`HubConfig`]          |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] handler _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use evchannel::{EventChannel, Handle, HandlerError};
//!
//! #[derive(Debug, Clone)]
//! struct Player { name: String, deaths: u32 }
//!
//! #[derive(Default)]
//! struct Scoreboard { deaths: AtomicU32 }
//!
//! impl Handle<Player> for Scoreboard {
//!     fn on_event(&self, _player: &Player) -> Result<(), HandlerError> {
//!         self.deaths.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     }
//!     fn name(&self) -> &str { "scoreboard" }
//! }
//!
//! let on_death: EventChannel<Player> = EventChannel::named("player_died");
//! let board = Arc::new(Scoreboard::default());
//! let token = on_death.subscribe(board.clone());
//!
//! let hero = Player { name: "hero".into(), deaths: 1 };
//! on_death.publish(&hero)?;
//! on_death.publish(&hero)?;
//!
//! on_death.unsubscribe(token);
//! on_death.publish(&hero)?;
//! assert_eq!(board.deaths.load(Ordering::Relaxed), 2);
//! # Ok::<(), evchannel::DispatchError>(())
//! ```
mod channel;
mod envelope;
mod error;
mod handlers;
mod hub;
mod policies;

// ---- Public re-exports ----

pub use channel::{
    ChannelConfig, ChannelId, DispatchReport, EventChannel, HandlerFailure, Subscription,
    SubscriptionToken,
};
pub use envelope::Envelope;
pub use error::{DispatchError, HandlerError, HubError};
pub use handlers::{Handle, HandlerFn, HandlerRef};
pub use hub::{Hub, HubConfig};
pub use policies::FailurePolicy;

// Optional: expose a simple built-in tracing handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogWriter;
