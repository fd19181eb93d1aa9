use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub user_name: String,
}

impl User {
    pub async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}

/// 点赞前校验用户是否存在
#[async_trait]
pub trait UserResolver: Send + Sync {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;
}

pub struct PgUserResolver {
    pool: PgPool,
}

impl PgUserResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserResolver for PgUserResolver {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, user_id).await?)
    }
}
