//! Expiring key-value store used for OTP records.
//!
//! The contract is deliberately narrow: `SET key value EX seconds`,
//! `GET key`, `DEL key`, `TTL key`. Expiry is enforced by the store itself,
//! not by callers. Two implementations are provided: [`RedisKv`] for
//! production and [`MemoryKv`] for tests and redis-less deployments.

pub mod memory;
pub mod redis_store;

pub use memory::MemoryKv;
pub use redis_store::RedisKv;

/// Error type for key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Transport-level Redis failure (connection, protocol, timeout).
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Narrow expiring key-value contract.
///
/// Each operation is atomic per key; no cross-key coordination is assumed.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Set `key` to `value` with an absolute expiry of `ttl_secs` seconds,
    /// overwriting any existing value and its expiry.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Get the live value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn del(&self, key: &str) -> Result<(), CacheError>;

    /// Remaining time-to-live in seconds, or `None` if the key is absent
    /// (or carries no expiry).
    async fn ttl(&self, key: &str) -> Result<Option<i64>, CacheError>;
}
