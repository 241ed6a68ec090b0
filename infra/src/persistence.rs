use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use err_derive::Error;
use log::*;

#[derive(Error, Debug, PartialEq, Eq)]
#[error(display = "storage quota of {} bytes exceeded", quota)]
pub struct QuotaExceeded {
    pub quota: usize,
}

/// A flat namespace of string keys holding serialized values.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage::default()
    }

    /// Refuses any write that would take the total size of keys and values
    /// beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        MemStorage {
            quota: Some(quota),
            ..Default::default()
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries();
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(QuotaExceeded { quota }.into());
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SledStorage {
    db: sled::Db,
}

impl SledStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Open sled database at {:?}", path);
        let db = sled::open(path).with_context(|| format!("open {:?}", path))?;
        Ok(SledStorage { db })
    }

    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .context("open temporary database")?;
        Ok(SledStorage { db })
    }
}

impl Storage for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key)? {
            Some(bytes) => {
                let s = String::from_utf8(bytes.to_vec())
                    .with_context(|| format!("value at {} is not utf-8", key))?;
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.insert(key, value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.remove(key)?;
        self.db.flush()?;
        Ok(())
    }
}
