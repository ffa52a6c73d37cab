//! Session state service backed by Redis.
//!
//! The only per-session state is the index-view visit counter. A session
//! is created when the first visit is recorded, refreshed on every
//! subsequent visit, and expires after the configured idle TTL.

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SessionsService {
    client: Client,
    ttl_seconds: u64,
}

impl SessionsService {
    /// Create a new sessions service and verify the Redis connection
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            ttl_seconds,
        })
    }

    /// Record a visit for the session and return the updated count.
    /// The session TTL is refreshed on each visit.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let key = format!("session:visits:{}", session_id);
        let count: i64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to increment visit count: {}", e)))?;

        conn.expire::<_, ()>(&key, self.ttl_seconds as i64)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to refresh session TTL: {}", e)))?;

        Ok(count)
    }
}
