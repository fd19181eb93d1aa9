use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient, RedisResult, aio::MultiplexedConnection};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// 文章点赞数缓存，只是派生数据，任何时候都可以从数据库重建
#[async_trait]
pub trait CountCache: Send + Sync {
    async fn get(&self, article_id: &str) -> Result<Option<i64>, CacheError>;

    async fn set(&self, article_id: &str, value: i64, ttl: Duration) -> Result<(), CacheError>;

    async fn invalidate(&self, article_id: &str) -> Result<(), CacheError>;
}

pub fn like_count_key(article_id: &str) -> String {
    format!("article:{}:likes", article_id)
}

pub struct RedisCountCache {
    redis: Arc<RedisClient>,
    timeout: Duration,
}

impl RedisCountCache {
    pub fn new(redis: Arc<RedisClient>, timeout: Duration) -> Self {
        Self { redis, timeout }
    }

    // Redis 不可达时连接可能挂起很久，所有调用都加上超时
    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
            .map_err(CacheError::from)
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        self.bounded(self.redis.get_multiplexed_async_connection())
            .await
    }
}

#[async_trait]
impl CountCache for RedisCountCache {
    async fn get(&self, article_id: &str) -> Result<Option<i64>, CacheError> {
        let mut conn = self.connection().await?;
        let key = like_count_key(article_id);
        let value = self.bounded(conn.get::<_, Option<i64>>(&key)).await?;
        tracing::debug!("Get like count from cache: {} = {:?}", key, value);
        Ok(value)
    }

    async fn set(&self, article_id: &str, value: i64, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let key = like_count_key(article_id);
        self.bounded(conn.set_ex::<_, _, ()>(&key, value, ttl.as_secs().max(1)))
            .await?;
        tracing::debug!("Set like count to cache: {} = {}", key, value);
        Ok(())
    }

    async fn invalidate(&self, article_id: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let key = like_count_key(article_id);
        self.bounded(conn.del::<_, ()>(&key)).await?;
        tracing::debug!("Invalidate like count cache: {}", key);
        Ok(())
    }
}
