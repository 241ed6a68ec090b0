//! Typed JSON access over a [`Storage`] namespace, with synchronous change
//! notification.
//!
//! Reads never fail: a missing or unparseable value yields the caller's
//! default. Writes never fail either; a rejected write is logged and
//! dropped, and subscribers only hear about writes that were stored.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use log::*;
use serde::{de::DeserializeOwned, Serialize};

use crate::persistence::Storage;

type Subscriber = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

pub struct Store<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    storage: S,
    subscribers: Mutex<Subscribers>,
}

#[derive(Default)]
struct Subscribers {
    next: u64,
    list: Vec<(SubscriptionId, Subscriber)>,
}

impl<S: Storage> Store<S> {
    pub fn new(storage: S) -> Self {
        let subscribers = Mutex::new(Subscribers::default());
        let inner = Arc::new(Inner {
            storage,
            subscribers,
        });
        Store { inner }
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.inner.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!("Could not read {}: {:?}", key, e);
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(val) => val,
            Err(e) => {
                warn!("Discarding unparseable value at {}: {}", key, e);
                default
            }
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match self.try_write(key, value) {
            Ok(()) => self.notify(key),
            Err(e) => error!("Error saving {}: {:?}", key, e),
        }
    }

    pub fn remove(&self, key: &str) {
        match self.inner.storage.remove(key) {
            Ok(()) => self.notify(key),
            Err(e) => error!("Error removing {}: {:?}", key, e),
        }
    }

    /// Writes `defaults()` under `key` when the array stored there is empty
    /// or unreadable. Returns whether anything was written.
    pub fn seed_with<T, F>(&self, key: &str, defaults: F) -> bool
    where
        T: Serialize,
        F: FnOnce() -> Vec<T>,
    {
        let current: Vec<serde_json::Value> = self.read(key, Vec::new());
        if !current.is_empty() {
            trace!("{} already holds {} records", key, current.len());
            return false;
        }
        let defaults = defaults();
        debug!("Seeding {} with {} records", key, defaults.len());
        self.write(key, &defaults);
        true
    }

    /// Registers `f` to be called with the key of every committed write,
    /// after any subscribers registered earlier.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut subs = self.subscribers();
        let id = SubscriptionId(subs.next);
        subs.next += 1;
        let f: Subscriber = Arc::new(f);
        subs.list.push((id, f));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers();
        let before = subs.list.len();
        subs.list.retain(|(sid, _)| *sid != id);
        subs.list.len() != before
    }

    fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.inner.storage.set(key, &json)?;
        trace!("Wrote {} bytes to {}", json.len(), key);
        Ok(())
    }

    fn notify(&self, key: &str) {
        // Snapshot so that a subscriber may itself write to the store.
        let subs = self
            .subscribers()
            .list
            .iter()
            .map(|(_, f)| f.clone())
            .collect::<Vec<_>>();
        for f in subs {
            f(key);
        }
    }

    fn subscribers(&self) -> MutexGuard<Subscribers> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        let inner = self.inner.clone();
        Store { inner }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let nsubs = self
            .inner
            .subscribers
            .lock()
            .map(|s| s.list.len())
            .unwrap_or_default();
        fmt.debug_struct("Store")
            .field("storage", &self.inner.storage)
            .field("subscribers", &nsubs)
            .finish()
    }
}
