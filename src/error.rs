use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::result::ApiResult;
use crate::utils::{error_codes, messages};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("rate limited: {0}")]
    RateLimited(&'static str),
    #[error("internal server error")]
    InternalServerError,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, error_message) = match self {
            AppError::Unauthorized => (error_codes::AUTH_FAILED, messages::UNAUTHORIZED.to_string()),
            AppError::InvalidRequest(msg) => (error_codes::VALIDATION_ERROR, msg),
            AppError::NotFound(msg) => (error_codes::NOT_FOUND, msg.to_string()),
            AppError::RateLimited(msg) => (error_codes::RATE_LIMIT, msg.to_string()),
            AppError::InternalServerError => (
                error_codes::INTERNAL_ERROR,
                messages::INTERNAL_ERROR.to_string(),
            ),
        };

        (status, Json(ApiResult::<()>::error(code, error_message))).into_response()
    }
}

/// 持久层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 唯一约束冲突，并发写入时出现
    #[error("record already exists")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn from_insert(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict,
            other => StoreError::Database(other),
        }
    }
}
