use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleInfo {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl ArticleInfo {
    pub fn new(article: Article, likes_count: i64) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            author_id: article.author_id,
            likes_count,
            created_at: article.created_at,
            modified_at: article.modified_at,
        }
    }
}

impl Article {
    pub async fn find_by_id(pool: &PgPool, article_id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, author_id, created_at, modified_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(article_id)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
pub trait ArticleResolver: Send + Sync {
    async fn get_by_id(&self, article_id: &str) -> Result<Option<Article>, StoreError>;
}

pub struct PgArticleResolver {
    pool: PgPool,
}

impl PgArticleResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleResolver for PgArticleResolver {
    async fn get_by_id(&self, article_id: &str) -> Result<Option<Article>, StoreError> {
        Ok(Article::find_by_id(&self.pool, article_id).await?)
    }
}
