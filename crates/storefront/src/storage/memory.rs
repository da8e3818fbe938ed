//! In-process key-value store shared between tabs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::{KeyValueStore, StorageChange, StorageError, TabId, check_quota, map_size};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
struct Shared {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    changes: broadcast::Sender<StorageChange>,
}

/// A store held in memory.
///
/// Cloning yields another handle for the *same* tab. Use
/// [`MemoryStorage::open_tab`] to get a handle that behaves like a second
/// browser tab: it shares the data, and its writes are announced to the
/// subscribers of every other tab.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
    tab: TabId,
}

impl MemoryStorage {
    /// Create an empty store with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::with_quota(None)
    }

    /// Create an empty store that rejects writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: Option<usize>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(HashMap::new()),
                quota,
                changes,
            }),
            tab: TabId::new(),
        }
    }

    /// Open a new tab onto the same data.
    #[must_use]
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            tab: TabId::new(),
        }
    }

    /// The tab this handle writes as.
    #[must_use]
    pub const fn tab_id(&self) -> TabId {
        self.tab
    }

    /// Subscribe to changes made by other tabs.
    #[must_use]
    pub fn subscribe(&self) -> StorageEvents {
        StorageEvents {
            receiver: self.shared.changes.subscribe(),
            tab: self.tab,
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.shared
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn publish(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        if old_value == new_value {
            return;
        }
        // No subscribers is fine.
        let _ = self.shared.changes.send(StorageChange {
            key: key.to_string(),
            old_value,
            new_value,
            origin: self.tab,
        });
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old = {
            let mut entries = self.entries()?;
            let needed = map_size(entries.iter().filter(|(k, _)| k.as_str() != key))
                + key.len()
                + value.len();
            check_quota(self.shared.quota, needed)?;
            entries.insert(key.to_string(), value.to_string())
        };
        self.publish(key, old, Some(value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let old = self.entries()?.remove(key);
        self.publish(key, old, None);
        Ok(())
    }
}

/// Change notifications from other tabs, as seen by one tab.
///
/// Changes made by the subscribing tab itself are skipped, matching the
/// browser's `storage` event.
#[derive(Debug)]
pub struct StorageEvents {
    receiver: broadcast::Receiver<StorageChange>,
    tab: TabId,
}

impl StorageEvents {
    /// Take the next pending change without waiting.
    pub fn try_next(&mut self) -> Option<StorageChange> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) if change.origin == self.tab => {}
                Ok(change) => return Some(change),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Storage change notifications dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next change. Returns `None` once the store is dropped.
    pub async fn next(&mut self) -> Option<StorageChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.origin == self.tab => {}
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Storage change notifications dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let store = MemoryStorage::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_tabs_share_data() {
        let first = MemoryStorage::new();
        let second = first.open_tab();
        first.set_item("k", "v").unwrap();
        assert_eq!(second.get_item("k").unwrap().as_deref(), Some("v"));
        assert_ne!(first.tab_id(), second.tab_id());
    }

    #[test]
    fn test_changes_reach_other_tabs_only() {
        let first = MemoryStorage::new();
        let second = first.open_tab();
        let mut first_events = first.subscribe();
        let mut second_events = second.subscribe();

        first.set_item("k", "v").unwrap();

        assert!(first_events.try_next().is_none());
        let change = second_events.try_next().unwrap();
        assert_eq!(change.key, "k");
        assert_eq!(change.old_value, None);
        assert_eq!(change.new_value.as_deref(), Some("v"));
        assert_eq!(change.origin, first.tab_id());
    }

    #[test]
    fn test_unchanged_value_is_not_announced() {
        let first = MemoryStorage::new();
        let second = first.open_tab();
        first.set_item("k", "v").unwrap();
        let mut events = second.subscribe();
        first.set_item("k", "v").unwrap();
        assert!(events.try_next().is_none());
    }

    #[test]
    fn test_quota_rejects_large_write() {
        let store = MemoryStorage::with_quota(Some(10));
        store.set_item("k", "1234").unwrap();
        let err = store.set_item("k", "0123456789").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        ));
        // Failed write leaves the old value in place.
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_quota_counts_every_key() {
        let store = MemoryStorage::with_quota(Some(10));
        store.set_item("a", "12345").unwrap();
        // Each write fits alone; together they do not.
        let err = store.set_item("b", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 12,
                quota: 10
            }
        ));
        store.remove_item("a").unwrap();
        store.set_item("b", "12345").unwrap();
    }

    #[tokio::test]
    async fn test_async_next() {
        let first = MemoryStorage::new();
        let second = first.open_tab();
        let mut events = second.subscribe();
        first.remove_item("absent").unwrap();
        first.set_item("k", "v").unwrap();
        let change = events.next().await.unwrap();
        assert_eq!(change.key, "k");
    }
}
