//! In-process [`KvStore`] implementation.
//!
//! Used by the test suites and by deployments that run without Redis.
//! Expiry is checked lazily on read; `get` on an expired key removes it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::{CacheError, KvStore};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Expiring key-value store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKv {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>, CacheError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) => {
                let remaining = entry.expires_at.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    Ok(None)
                } else {
                    Ok(Some(remaining.as_secs() as i64))
                }
            }
            None => Ok(None),
        }
    }
}
