use axum::{
    Json,
    extract::{Path, State},
};

use super::model::ArticleInfo;
use crate::{AppState, error::AppError, result::ApiResult, utils::messages};

#[axum::debug_handler]
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<Json<ApiResult<ArticleInfo>>, AppError> {
    if article_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("Article id is required".to_string()));
    }

    let article = state
        .articles
        .get_by_id(&article_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load article {}: {}", article_id, e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::NotFound(messages::ARTICLE_NOT_FOUND))?;

    let likes_count = state.likes.total_likes(&article.id).await.map_err(|e| {
        tracing::error!("Failed to count likes for article {}: {}", article_id, e);
        AppError::InternalServerError
    })?;

    Ok(Json(ApiResult::success(ArticleInfo::new(article, likes_count))))
}
