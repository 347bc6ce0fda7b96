//! In-process verification record store
//!
//! Suitable for a single instance and for tests. Records are lost when the
//! process exits. Expired entries are dropped when touched, and swept from
//! the whole map on every write that inserts a key.

use async_trait::async_trait;
use pv_core::errors::StoreError;
use pv_core::services::VerificationStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &[u8], ttl_seconds: u64) -> Self {
        let expires_at = if ttl_seconds == 0 {
            None
        } else {
            Instant::now().checked_add(Duration::from_secs(ttl_seconds))
        };
        Self {
            value: value.to_vec(),
            expires_at,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// `VerificationStore` over a mutex-guarded map.
///
/// Every operation runs under one lock, which makes `set_if_absent` and
/// `compare_and_set` atomic.
#[derive(Debug, Default)]
pub struct MemoryVerificationStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries held in the map, expired or not
    #[cfg(test)]
    pub(crate) fn held_entries(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Look up a live entry, dropping it if it has expired
    fn live_entry<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
    ) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    /// Drop every expired entry. Request ids are never reused, so entries
    /// left to lazy expiry alone would accumulate.
    fn purge_expired(entries: &mut HashMap<String, Entry>) {
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!("Purged {} expired entries from memory store", purged);
        }
    }
}

#[async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        Self::purge_expired(&mut entries);
        entries.insert(key.to_string(), Entry::new(value, ttl_seconds));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self.lock()?;
        Ok(Self::live_entry(&mut entries, key).map(|e| e.value.clone()))
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &[u8],
        ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;
        Self::purge_expired(&mut entries);
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), Entry::new(value, ttl_seconds));
        Ok(true)
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: &[u8],
        value: &[u8],
    ) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;
        match Self::live_entry(&mut entries, key) {
            Some(entry) if entry.value == expected => {
                entry.value = value.to_vec();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
