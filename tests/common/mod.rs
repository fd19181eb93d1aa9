#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use likes_backend::error::StoreError;
use likes_backend::limiter::FixedWindowLimiter;
use likes_backend::routes::article::{Article, ArticleResolver};
use likes_backend::routes::like::{
    CacheError, CountCache, LikeCoordinator, LikeRecord, MembershipStore,
};
use likes_backend::routes::user::{User, UserResolver};

pub const ARTICLE: &str = "article-1";
pub const USER: &str = "user-1";

fn store_down() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

/// 内存版点赞存储，模拟数据库的唯一约束
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<(String, String), LikeRecord>>,
    pub find_calls: AtomicUsize,
    pub fail_count: AtomicBool,
    /// 下一次 add 时模拟另一个请求抢先插入
    pub lose_next_add: AtomicBool,
}

impl InMemoryStore {
    pub fn records_for(&self, article_id: &str, user_id: &str) -> usize {
        self.records
            .lock()
            .unwrap()
            .keys()
            .filter(|(a, u)| a == article_id && u == user_id)
            .count()
    }

    pub fn total(&self, article_id: &str) -> i64 {
        self.records
            .lock()
            .unwrap()
            .keys()
            .filter(|(a, _)| a == article_id)
            .count() as i64
    }

    pub fn seed(&self, article_id: &str, user_id: &str) {
        self.records.lock().unwrap().insert(
            (article_id.to_string(), user_id.to_string()),
            LikeRecord::new(article_id, user_id),
        );
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn find(
        &self,
        article_id: &str,
        user_id: &str,
    ) -> Result<Option<LikeRecord>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(article_id.to_string(), user_id.to_string()))
            .cloned())
    }

    async fn count(&self, article_id: &str) -> Result<i64, StoreError> {
        tokio::task::yield_now().await;
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        Ok(self.total(article_id))
    }

    async fn add(&self, record: LikeRecord) -> Result<LikeRecord, StoreError> {
        tokio::task::yield_now().await;
        let key = (record.article_id.clone(), record.user_id.clone());
        let mut records = self.records.lock().unwrap();
        if self.lose_next_add.swap(false, Ordering::SeqCst) {
            records.insert(key, record);
            return Err(StoreError::Conflict);
        }
        if records.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        records.insert(key, record.clone());
        Ok(record)
    }

    async fn remove(&self, record: &LikeRecord) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.records
            .lock()
            .unwrap()
            .remove(&(record.article_id.clone(), record.user_id.clone()));
        Ok(())
    }
}

/// 内存版计数缓存，可切换为不可达
#[derive(Default)]
pub struct FakeCache {
    values: Mutex<HashMap<String, i64>>,
    pub unreachable: AtomicBool,
    pub hits: AtomicUsize,
}

impl FakeCache {
    pub fn value(&self, article_id: &str) -> Option<i64> {
        self.values.lock().unwrap().get(article_id).copied()
    }

    pub fn put(&self, article_id: &str, value: i64) {
        self.values
            .lock()
            .unwrap()
            .insert(article_id.to_string(), value);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(CacheError::Timeout(Duration::from_millis(1)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CountCache for FakeCache {
    async fn get(&self, article_id: &str) -> Result<Option<i64>, CacheError> {
        self.check()?;
        let value = self.value(article_id);
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(value)
    }

    async fn set(&self, article_id: &str, value: i64, _ttl: Duration) -> Result<(), CacheError> {
        self.check()?;
        self.put(article_id, value);
        Ok(())
    }

    async fn invalidate(&self, article_id: &str) -> Result<(), CacheError> {
        self.check()?;
        self.values.lock().unwrap().remove(article_id);
        Ok(())
    }
}

pub struct FakeArticles(HashMap<String, Article>);

impl FakeArticles {
    pub fn with(ids: &[&str]) -> Self {
        Self(
            ids.iter()
                .map(|id| {
                    (
                        id.to_string(),
                        Article {
                            id: id.to_string(),
                            title: format!("Title of {}", id),
                            content: "content".into(),
                            author_id: "author".into(),
                            created_at: Utc::now(),
                            modified_at: None,
                        },
                    )
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ArticleResolver for FakeArticles {
    async fn get_by_id(&self, article_id: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.0.get(article_id).cloned())
    }
}

pub struct FakeUsers(Vec<String>);

impl FakeUsers {
    pub fn with(ids: &[&str]) -> Self {
        Self(ids.iter().map(|id| id.to_string()).collect())
    }
}

#[async_trait]
impl UserResolver for FakeUsers {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.0.iter().find(|id| *id == user_id).map(|id| User {
            id: id.clone(),
            user_name: format!("name-{}", id),
        }))
    }
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<FakeCache>,
    pub articles: Arc<FakeArticles>,
    pub limiter: Arc<FixedWindowLimiter>,
    pub coordinator: Arc<LikeCoordinator>,
}

pub fn harness(like_limit: u32) -> Harness {
    build(like_limit, true)
}

pub fn harness_without_cache(like_limit: u32) -> Harness {
    build(like_limit, false)
}

fn build(like_limit: u32, with_cache: bool) -> Harness {
    let store = Arc::new(InMemoryStore::default());
    let cache = Arc::new(FakeCache::default());
    let articles = Arc::new(FakeArticles::with(&[ARTICLE, "article-2"]));
    let users = Arc::new(FakeUsers::with(&[USER, "user-2", "user-3"]));
    let limiter = Arc::new(FixedWindowLimiter::new(
        "like",
        like_limit,
        Duration::from_secs(300),
    ));

    let mut coordinator = LikeCoordinator::new(
        store.clone(),
        articles.clone(),
        users,
        limiter.clone(),
        Duration::from_secs(300),
    );
    if with_cache {
        coordinator = coordinator.with_cache(cache.clone());
    }

    Harness {
        store,
        cache,
        articles,
        limiter,
        coordinator: Arc::new(coordinator),
    }
}
