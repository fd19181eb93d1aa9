use async_trait::async_trait;
use sqlx::PgPool;

use super::model::LikeRecord;
use crate::error::StoreError;

/// 点赞关系的持久化存储，也是点赞数的唯一可信来源
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find(&self, article_id: &str, user_id: &str)
    -> Result<Option<LikeRecord>, StoreError>;

    async fn count(&self, article_id: &str) -> Result<i64, StoreError>;

    /// 同一 (article_id, user_id) 已存在时返回 `StoreError::Conflict`
    async fn add(&self, record: LikeRecord) -> Result<LikeRecord, StoreError>;

    async fn remove(&self, record: &LikeRecord) -> Result<(), StoreError>;
}

pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn find(
        &self,
        article_id: &str,
        user_id: &str,
    ) -> Result<Option<LikeRecord>, StoreError> {
        let record = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT article_id, user_id, created_at
            FROM article_likes
            WHERE article_id = $1 AND user_id = $2
            "#,
        )
        .bind(article_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn count(&self, article_id: &str) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM article_likes WHERE article_id = $1",
        )
        .bind(article_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn add(&self, record: LikeRecord) -> Result<LikeRecord, StoreError> {
        // 依赖 (article_id, user_id) 唯一约束，不做应用层加锁
        sqlx::query_as::<_, LikeRecord>(
            r#"
            INSERT INTO article_likes (article_id, user_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING article_id, user_id, created_at
            "#,
        )
        .bind(&record.article_id)
        .bind(&record.user_id)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_insert)
    }

    async fn remove(&self, record: &LikeRecord) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM article_likes WHERE article_id = $1 AND user_id = $2")
            .bind(&record.article_id)
            .bind(&record.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                article_id = %record.article_id,
                user_id = %record.user_id,
                "Like already removed by a concurrent request"
            );
        }

        Ok(())
    }
}
