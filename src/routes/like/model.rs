use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 某用户对某文章的一条点赞记录，(article_id, user_id) 唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LikeRecord {
    pub article_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl LikeRecord {
    pub fn new(article_id: &str, user_id: &str) -> Self {
        Self {
            article_id: article_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeSummary {
    pub total_likes: i64,
    pub has_user_liked: bool,
}
