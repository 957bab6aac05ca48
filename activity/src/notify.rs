use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::types::ActivityRecord;

/// Change signal broadcast by the ledger after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    RecordAdded(ActivityRecord),
    Cleared,
    /// `added` previously unknown records survived the merge.
    Imported { added: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Registry of ledger observers.
///
/// Delivery is synchronous and in subscription order. Callbacks are
/// snapshotted before delivery, so a callback may subscribe or unsubscribe
/// without deadlocking; such changes apply from the next event on.
#[derive(Default)]
pub struct Subscribers {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Callback)>>,
}

impl Subscribers {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries().push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(sid, _)| *sid != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, event: &LedgerEvent) {
        let snapshot: Vec<Callback> = self
            .entries()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    // A panicking observer must not take the registry down with it.
    fn entries(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Callback)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}
