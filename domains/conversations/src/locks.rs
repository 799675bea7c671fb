//! Per-conversation writer locks
//!
//! A completion turn holds its conversation's lock from load to append, so
//! concurrent sends on one conversation run one after another. Entries are
//! removed once nobody holds or waits on them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use converse_common::ObjectId;

type LockMap = DashMap<ObjectId, Arc<Mutex<()>>>;

#[derive(Clone, Default)]
pub struct ConversationLocks {
    inner: Arc<LockMap>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to conversation `id`
    ///
    /// Cancel safe: a waiter dropped before it gets the lock still releases
    /// its map entry.
    pub async fn acquire(&self, id: ObjectId) -> ConversationGuard {
        let lock = self.inner.entry(id).or_default().clone();
        let entry = LockEntry {
            id,
            locks: self.inner.clone(),
            lock: Some(lock.clone()),
        };
        let guard = lock.lock_owned().await;
        ConversationGuard {
            _guard: guard,
            _entry: entry,
        }
    }

    /// Conversations with a holder or waiter
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Holds one reference to a map entry and drops it when the entry goes idle
struct LockEntry {
    id: ObjectId,
    locks: Arc<LockMap>,
    lock: Option<Arc<Mutex<()>>>,
}

impl Drop for LockEntry {
    fn drop(&mut self) {
        self.lock.take();
        self.locks
            .remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

pub struct ConversationGuard {
    // Declared first so the mutex is released before the entry is checked
    _guard: OwnedMutexGuard<()>,
    _entry: LockEntry,
}
