//! Key/value item storage with per-key subscriber registry
//!
//! This module provides the core storage primitive for appliance state:
//! a mapping from item key to last-known value, plus a registry of per-key
//! callbacks invoked synchronously whenever an item is applied.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::item::Item;

/// Callback invoked with each applied item for a subscribed key
pub type ItemCallback = dyn Fn(&Item) + Send + Sync;

/// Token returned by [`ItemStore::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Key/value item cache with batch-atomic apply and per-key subscribers
///
/// A read of any key returns the most recently *applied* value, never a
/// partially-applied batch: when multiple items arrive together, all are
/// written before any subscriber is notified.
///
/// Subscribers for a key are invoked synchronously, in registration order,
/// once per applied item for that key. Item application is single-writer
/// (one engine task applies batches); reads may come from any thread.
///
/// # Example
///
/// ```rust
/// use item_store::{Item, ItemStore};
/// use serde_json::json;
///
/// let store = ItemStore::new();
/// store.subscribe("connected", |item| {
///     println!("connected changed: {}", item.value);
/// });
/// store.apply(&[Item::new("connected", json!(true))]);
/// assert_eq!(store.get("connected"), Some(json!(true)));
/// ```
#[derive(Clone)]
pub struct ItemStore {
    inner: Arc<Inner>,
}

struct Inner {
    /// Item storage: key -> last-known value
    items: RwLock<HashMap<String, Value>>,

    /// Subscriber registry: key -> ordered callback list
    subscribers: Mutex<HashMap<String, Vec<(SubscriptionId, Arc<ItemCallback>)>>>,

    /// Next subscription token
    next_id: AtomicU64,
}

impl ItemStore {
    /// Create a new empty item store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                items: RwLock::new(HashMap::new()),
                subscribers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Get the last-known value for a key
    ///
    /// Returns `None` if the key has never been applied.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.items.read().get(key).cloned()
    }

    /// Apply a batch of items
    ///
    /// All items are written to the cache first; only then are subscribers
    /// notified, per item, in the batch's given order. Subscribers therefore
    /// always observe the fully-applied batch.
    pub fn apply(&self, batch: &[Item]) {
        if batch.is_empty() {
            return;
        }

        {
            let mut items = self.inner.items.write();
            for item in batch {
                items.insert(item.key.clone(), item.value.clone());
            }
        }

        for item in batch {
            self.notify(item);
        }
    }

    /// Register a callback for a key
    ///
    /// The callback fires for every applied item with that key, including
    /// re-applications of an unchanged value (the transport decides what is
    /// worth reporting, not the cache).
    pub fn subscribe<F>(&self, key: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: Fn(&Item) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        self.inner
            .subscribers
            .lock()
            .entry(key.into())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a previously registered callback, returning whether it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.lock();
        let mut removed = false;
        subscribers.retain(|_, list| {
            let before = list.len();
            list.retain(|(sub_id, _)| *sub_id != id);
            removed |= list.len() != before;
            !list.is_empty()
        });
        removed
    }

    /// Drop every registered callback (teardown)
    pub fn clear_subscribers(&self) {
        self.inner.subscribers.lock().clear();
    }

    /// All keys currently cached
    pub fn keys(&self) -> Vec<String> {
        self.inner.items.read().keys().cloned().collect()
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    /// Check whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke subscribers for one applied item, in registration order
    ///
    /// Callbacks are cloned out of the registry lock before invocation so a
    /// callback may itself subscribe or unsubscribe without deadlocking.
    fn notify(&self, item: &Item) {
        let callbacks: Vec<Arc<ItemCallback>> = self
            .inner
            .subscribers
            .lock()
            .get(&item.key)
            .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();

        for callback in callbacks {
            callback(item);
        }
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("item_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_get_returns_last_applied() {
        let store = ItemStore::new();
        assert!(store.is_empty());

        store.apply(&[Item::new("power", json!("On"))]);
        store.apply(&[Item::new("power", json!("Standby"))]);

        assert_eq!(store.get("power"), Some(json!("Standby")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_batch_written_before_any_notification() {
        // A subscriber for the first item of a batch must already see the
        // second item's new value when it fires.
        let store = ItemStore::new();
        let observed = Arc::new(Mutex::new(None));

        let store_cb = store.clone();
        let observed_cb = Arc::clone(&observed);
        store.subscribe("program", move |_item| {
            *observed_cb.lock() = store_cb.get("option");
        });

        store.apply(&[
            Item::new("program", json!("Cotton")),
            Item::new("option", json!(40)),
        ]);

        assert_eq!(*observed.lock(), Some(json!(40)));
    }

    #[test]
    fn test_notification_order_matches_batch_order() {
        let store = ItemStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for key in ["a", "b"] {
            let order_cb = Arc::clone(&order);
            store.subscribe(key, move |item| {
                order_cb.lock().push(item.key.clone());
            });
        }

        store.apply(&[Item::new("b", json!(1)), Item::new("a", json!(2))]);

        assert_eq!(*order.lock(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_subscribers_fire_in_registration_order() {
        let store = ItemStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in [1, 2, 3] {
            let order_cb = Arc::clone(&order);
            store.subscribe("k", move |_item| {
                order_cb.lock().push(tag);
            });
        }

        store.apply(&[Item::new("k", json!("v"))]);

        assert_eq!(*order.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unsubscribe() {
        let store = ItemStore::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_cb = Arc::clone(&count);
        let id = store.subscribe("k", move |_item| {
            count_cb.fetch_add(1, Ordering::SeqCst);
        });

        store.apply(&[Item::new("k", json!(1))]);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.apply(&[Item::new("k", json!(2))]);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_subscribers() {
        let store = ItemStore::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_cb = Arc::clone(&count);
        store.subscribe("k", move |_item| {
            count_cb.fetch_add(1, Ordering::SeqCst);
        });

        store.clear_subscribers();
        store.apply(&[Item::new("k", json!(1))]);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        // Values survive subscriber teardown
        assert_eq!(store.get("k"), Some(json!(1)));
    }

    #[test]
    fn test_store_survives_panicking_subscriber() {
        let store = ItemStore::new();
        store.subscribe("k", |_item| panic!("subscriber bug"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.apply(&[Item::new("k", json!(1))]);
        }));
        assert!(result.is_err());

        // The cache and registry remain fully usable afterwards
        store.clear_subscribers();
        store.apply(&[Item::new("k", json!(2))]);
        assert_eq!(store.get("k"), Some(json!(2)));
        store.subscribe("k", |_item| {});
    }

    #[test]
    fn test_callback_may_subscribe_reentrantly() {
        let store = ItemStore::new();
        let store_cb = store.clone();
        store.subscribe("k", move |_item| {
            store_cb.subscribe("other", |_item| {});
        });

        // Must not deadlock
        store.apply(&[Item::new("k", json!(1))]);
    }
}
