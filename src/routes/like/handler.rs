use axum::{
    Extension, Json,
    extract::{Path, State},
};

use super::model::LikeSummary;
use crate::{AppState, error::AppError, result::ApiResult, utils::Claims};

#[axum::debug_handler]
pub async fn get_likes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(article_id): Path<String>,
) -> Result<Json<ApiResult<LikeSummary>>, AppError> {
    let summary = state.likes.get_likes(&article_id, &claims.sub).await?;
    Ok(Json(ApiResult::success(summary)))
}

#[axum::debug_handler]
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(article_id): Path<String>,
) -> Result<Json<ApiResult<LikeSummary>>, AppError> {
    let summary = state.likes.toggle(&article_id, &claims.sub).await?;
    Ok(Json(ApiResult::success(summary)))
}
