//! # Source-tagged payloads.
//!
//! Channels carry one payload type. When listeners need to know *who* raised an
//! event, put the sender in the payload: [`Envelope<S, P>`] is the ready-made
//! pairing, and [`EventChannel::publish_from`] builds it for you.
//!
//! ## Example
//! ```rust
//! use evchannel::{Envelope, EventChannel, HandlerError};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct EntityId(u32);
//!
//! let hits: EventChannel<Envelope<EntityId, u32>> = EventChannel::named("hit");
//! hits.subscribe_fn("damage-log", |ev| {
//!     assert_eq!(ev.source, EntityId(7));
//!     assert_eq!(ev.payload, 25);
//!     Ok(())
//! });
//!
//! hits.publish_from(EntityId(7), 25).unwrap();
//! ```

use crate::channel::{DispatchReport, EventChannel};
use crate::error::DispatchError;

/// A payload together with the identity of whoever published it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Envelope<S, P> {
    /// Emitting entity.
    pub source: S,
    /// Event data.
    pub payload: P,
}

impl<S, P> Envelope<S, P> {
    pub fn new(source: S, payload: P) -> Self {
        Self { source, payload }
    }
}

impl<S: 'static, P: 'static> EventChannel<Envelope<S, P>> {
    /// Publishes `payload` on behalf of `source`.
    ///
    /// Same semantics as [`publish`](EventChannel::publish); every handler
    /// receives the identical `(source, payload)` pair.
    pub fn publish_from(&self, source: S, payload: P) -> Result<DispatchReport, DispatchError> {
        self.publish(&Envelope::new(source, payload))
    }
}
