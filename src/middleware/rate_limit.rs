use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, limiter::FixedWindowLimiter, utils::messages};

/// 按客户端地址限流，作用于所有接口
pub async fn rate_limit(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req);

    if !limiter.admit(&ip) {
        return AppError::RateLimited(messages::TOO_MANY_REQUESTS).into_response();
    }

    next.run(req).await
}

// 优先使用代理头中的地址，最后降级使用连接地址
pub fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}
