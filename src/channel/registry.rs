//! # Ordered registration list with copy-on-write snapshots.
//!
//! ## Architecture
//! ```text
//! subscribe ─┐                          ┌─► publish: snapshot() ── iterate without lock
//! unsubscribe├─► RwLock<Arc<Vec<Entry>>>┤
//! prune ─────┘   (write: Arc::make_mut) └─► len / contains
//! ```
//!
//! ## Rules
//! - Entries keep insertion order; removal never reorders survivors
//! - Ids are unique per registry and increase monotonically (duplicates of the
//!   same handler get distinct ids)
//! - Writers clone the list only while a publish still holds the old snapshot

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::handlers::{Handle, HandlerRef};

/// How the registry holds on to a handler.
pub(crate) enum Target<T> {
    /// Registry keeps the handler alive until unsubscribed.
    Strong(HandlerRef<T>),
    /// Registry does not extend the handler's lifetime.
    Weak(Weak<dyn Handle<T>>),
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        match self {
            Target::Strong(h) => Target::Strong(Arc::clone(h)),
            Target::Weak(w) => Target::Weak(Weak::clone(w)),
        }
    }
}

/// One registration.
pub(crate) struct Entry<T> {
    pub(crate) id: u64,
    target: Target<T>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            target: self.target.clone(),
        }
    }
}

impl<T> Entry<T> {
    /// Returns a callable handler, or `None` if a weak target is gone.
    pub(crate) fn resolve(&self) -> Option<HandlerRef<T>> {
        match &self.target {
            Target::Strong(h) => Some(Arc::clone(h)),
            Target::Weak(w) => w.upgrade(),
        }
    }

    fn is_dead(&self) -> bool {
        match &self.target {
            Target::Strong(_) => false,
            Target::Weak(w) => w.strong_count() == 0,
        }
    }
}

pub(crate) struct Registry<T> {
    entries: RwLock<Arc<Vec<Entry<T>>>>,
    next_id: AtomicU64,
}

impl<T> Registry<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::with_capacity(capacity))),
            next_id: AtomicU64::new(1),
        }
    }

    /// Appends a registration and returns its id.
    pub(crate) fn insert(&self, target: Target<T>) -> u64 {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let mut guard = self.entries.write();
        Arc::make_mut(&mut *guard).push(Entry { id, target });
        id
    }

    /// Removes the registration with `id`. Returns `false` if there was none.
    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut guard = self.entries.write();
        let Some(pos) = guard.iter().position(|e| e.id == id) else {
            return false;
        };
        let gone = Arc::make_mut(&mut *guard).remove(pos);
        drop(guard);
        drop(gone);
        true
    }

    /// Removes the given ids if their targets are actually dead.
    pub(crate) fn prune(&self, ids: &[u64]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        self.take_where(|e| ids.contains(&e.id) && e.is_dead())
    }

    /// Removes every weak registration whose handler is gone.
    pub(crate) fn prune_all(&self) -> usize {
        self.take_where(Entry::is_dead)
    }

    /// Removes the entries matching `pred`. They are dropped after the lock is
    /// released, since dropping a handler may re-enter the registry.
    fn take_where(&self, pred: impl Fn(&Entry<T>) -> bool) -> usize {
        let mut guard = self.entries.write();
        if !guard.iter().any(&pred) {
            return 0;
        }
        let list = Arc::make_mut(&mut *guard);
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(list).into_iter().partition(&pred);
        *list = kept;
        drop(guard);
        gone.len()
    }

    /// Removes everything. Returns the number of registrations dropped.
    pub(crate) fn clear(&self) -> usize {
        let mut guard = self.entries.write();
        let old = std::mem::replace(&mut *guard, Arc::new(Vec::new()));
        drop(guard);
        old.len()
    }

    /// Current list; holding it does not block writers.
    pub(crate) fn snapshot(&self) -> Arc<Vec<Entry<T>>> {
        Arc::clone(&self.entries.read())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.read().iter().any(|e| e.id == id)
    }
}
