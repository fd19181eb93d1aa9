use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户ID
    pub exp: i64,    // 过期时间
    pub iat: i64,    // 签发时间
}

// 令牌签发由账户服务负责，这里只在本地联调和测试中使用
pub fn generate_token(
    user_id: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INTERNAL_ERROR: i32 = 5000;
}

pub mod messages {
    pub const INVALID_LIKE_DATA: &str = "Article id and user id are required";
    pub const ARTICLE_NOT_FOUND: &str = "Article not found";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const LIKE_RATE_LIMITED: &str =
        "You've reached the maximum number of like actions. Please try again later.";
    pub const TOO_MANY_REQUESTS: &str = "Too many requests. Please try again later.";
    pub const UNAUTHORIZED: &str = "Missing or invalid bearer token";
    pub const INTERNAL_ERROR: &str = "An error occurred while processing your request";
}
