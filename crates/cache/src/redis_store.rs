//! Redis-backed [`KvStore`] implementation.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::{CacheError, KvStore};

/// Key-value store backed by a Redis connection manager.
///
/// [`ConnectionManager`] reconnects automatically and is cheap to clone, so
/// each operation works on its own clone.
#[derive(Clone)]
pub struct RedisKv {
    conn: ConnectionManager,
}

impl RedisKv {
    /// Connect to the Redis instance at `url` (e.g. `redis://127.0.0.1/`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl KvStore for RedisKv {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>, CacheError> {
        let mut conn = self.conn.clone();
        // TTL returns -2 when the key does not exist, -1 when it has no expiry.
        let ttl: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await?;
        Ok(if ttl >= 0 { Some(ttl) } else { None })
    }
}
