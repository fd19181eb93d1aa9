use serde::{Deserialize, Serialize};

use crate::utils::error_codes;

/// 统一响应包体：成功时 `code` 为 0 并携带 `content`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            error_message: None,
            content: Some(data),
        }
    }
}

impl ApiResult<()> {
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            error_message: Some(message.into()),
            content: None,
        }
    }
}
