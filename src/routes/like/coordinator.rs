use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::cache::{CacheError, CountCache};
use super::model::{LikeRecord, LikeSummary};
use super::store::MembershipStore;
use crate::error::{AppError, StoreError};
use crate::limiter::FixedWindowLimiter;
use crate::routes::article::ArticleResolver;
use crate::routes::user::UserResolver;
use crate::utils::messages;

#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("article id and user id are required")]
    InvalidRequest,
    #[error("like rate limit exceeded")]
    RateLimited,
    #[error("article {0} not found")]
    ArticleNotFound(String),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LikeError> for AppError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::InvalidRequest => {
                AppError::InvalidRequest(messages::INVALID_LIKE_DATA.to_string())
            }
            LikeError::RateLimited => AppError::RateLimited(messages::LIKE_RATE_LIMITED),
            LikeError::ArticleNotFound(_) => AppError::NotFound(messages::ARTICLE_NOT_FOUND),
            LikeError::UserNotFound(_) => AppError::NotFound(messages::USER_NOT_FOUND),
            LikeError::Store(e) => {
                tracing::error!("Like store failure: {}", e);
                AppError::InternalServerError
            }
        }
    }
}

enum CacheLookup {
    Hit(i64),
    Miss,
    Unavailable,
}

/// 点赞切换与查询的协调者
///
/// 点赞关系每次都从数据库读取，只有文章的点赞总数会被缓存。
/// 缓存是尽力而为的：读写失败只记录日志和计数，不会影响请求结果。
pub struct LikeCoordinator {
    store: Arc<dyn MembershipStore>,
    cache: Option<Arc<dyn CountCache>>,
    articles: Arc<dyn ArticleResolver>,
    users: Arc<dyn UserResolver>,
    limiter: Arc<FixedWindowLimiter>,
    cache_ttl: Duration,
    cache_failures: AtomicU64,
}

impl LikeCoordinator {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        articles: Arc<dyn ArticleResolver>,
        users: Arc<dyn UserResolver>,
        limiter: Arc<FixedWindowLimiter>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache: None,
            articles,
            users,
            limiter,
            cache_ttl,
            cache_failures: AtomicU64::new(0),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn CountCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 缓存读写失败的累计次数
    pub fn cache_failures(&self) -> u64 {
        self.cache_failures.load(Ordering::Relaxed)
    }

    /// 切换点赞状态，返回切换后的总数和当前用户是否已点赞
    pub async fn toggle(&self, article_id: &str, user_id: &str) -> Result<LikeSummary, LikeError> {
        let (article_id, user_id) = validate(article_id, user_id)?;

        // 限流检查在任何数据库访问之前
        if !self.limiter.admit(&format!("like:{}", user_id)) {
            return Err(LikeError::RateLimited);
        }

        self.ensure_article(article_id).await?;
        self.ensure_user(user_id).await?;

        let has_user_liked = match self.store.find(article_id, user_id).await? {
            Some(existing) => {
                self.store.remove(&existing).await?;
                false
            }
            None => self.add_like(article_id, user_id).await?,
        };

        let total_likes = match self.store.count(article_id).await {
            Ok(count) => count,
            Err(e) => {
                // 关系已变更但无法重算总数，旧缓存不能再留
                self.invalidate_cached_count(article_id).await;
                return Err(e.into());
            }
        };
        self.store_cached_count(article_id, total_likes).await;

        tracing::info!(
            article_id,
            user_id,
            total_likes,
            has_user_liked,
            "Like toggled"
        );

        Ok(LikeSummary {
            total_likes,
            has_user_liked,
        })
    }

    pub async fn get_likes(
        &self,
        article_id: &str,
        user_id: &str,
    ) -> Result<LikeSummary, LikeError> {
        let (article_id, user_id) = validate(article_id, user_id)?;

        self.ensure_article(article_id).await?;
        self.ensure_user(user_id).await?;

        let total_likes = self.total_likes(article_id).await?;
        let has_user_liked = self.store.find(article_id, user_id).await?.is_some();

        Ok(LikeSummary {
            total_likes,
            has_user_liked,
        })
    }

    /// 文章点赞总数：优先读缓存，未命中时从数据库计数并回填
    pub async fn total_likes(&self, article_id: &str) -> Result<i64, StoreError> {
        match self.cached_count(article_id).await {
            CacheLookup::Hit(count) => Ok(count),
            CacheLookup::Miss => {
                let count = self.store.count(article_id).await?;
                self.store_cached_count(article_id, count).await;
                Ok(count)
            }
            CacheLookup::Unavailable => {
                tracing::warn!(
                    article_id,
                    "Cache unavailable, falling back to database for like count"
                );
                self.store.count(article_id).await
            }
        }
    }

    async fn add_like(&self, article_id: &str, user_id: &str) -> Result<bool, LikeError> {
        match self.store.add(LikeRecord::new(article_id, user_id)).await {
            Ok(_) => Ok(true),
            Err(StoreError::Conflict) => {
                // 并发请求已经插入了同一条记录，以数据库当前状态为准
                tracing::debug!(article_id, user_id, "Concurrent like detected, reconciling");
                Ok(self.store.find(article_id, user_id).await?.is_some())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_article(&self, article_id: &str) -> Result<(), LikeError> {
        match self.articles.get_by_id(article_id).await? {
            Some(_) => Ok(()),
            None => Err(LikeError::ArticleNotFound(article_id.to_string())),
        }
    }

    async fn ensure_user(&self, user_id: &str) -> Result<(), LikeError> {
        match self.users.get_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(LikeError::UserNotFound(user_id.to_string())),
        }
    }

    async fn cached_count(&self, article_id: &str) -> CacheLookup {
        let Some(cache) = &self.cache else {
            return CacheLookup::Miss;
        };

        match cache.get(article_id).await {
            Ok(Some(count)) if count >= 0 => CacheLookup::Hit(count),
            Ok(_) => CacheLookup::Miss,
            Err(e) => {
                self.record_cache_failure("get", article_id, &e);
                CacheLookup::Unavailable
            }
        }
    }

    async fn store_cached_count(&self, article_id: &str, count: i64) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(article_id, count, self.cache_ttl).await {
                self.record_cache_failure("set", article_id, &e);
            }
        }
    }

    async fn invalidate_cached_count(&self, article_id: &str) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate(article_id).await {
                self.record_cache_failure("invalidate", article_id, &e);
            }
        }
    }

    fn record_cache_failure(&self, op: &'static str, article_id: &str, err: &CacheError) {
        self.cache_failures.fetch_add(1, Ordering::Relaxed);
        tracing::error!(op, article_id, "Like count cache failure: {}", err);
    }
}

fn validate<'a>(article_id: &'a str, user_id: &'a str) -> Result<(&'a str, &'a str), LikeError> {
    let article_id = article_id.trim();
    let user_id = user_id.trim();
    if article_id.is_empty() || user_id.is_empty() {
        return Err(LikeError::InvalidRequest);
    }
    Ok((article_id, user_id))
}
