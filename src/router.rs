use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    limiter::FixedWindowLimiter,
    middleware::{auth_middleware, log_errors, rate_limit},
    routes,
};

// 公开路由
fn public_routes() -> Router<AppState> {
    Router::new().route("/articles/{article_id}", get(routes::article::find_by_id))
}

// 需要认证的点赞路由
fn like_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/likes/{article_id}", get(routes::like::get_likes))
        .route("/likes/{article_id}/toggle", post(routes::like::toggle_like))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

pub fn create_router(state: AppState, client_limiter: Arc<FixedWindowLimiter>) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(like_routes(&state));

    let router = if state.config.api_base_uri.is_empty() || state.config.api_base_uri == "/" {
        api
    } else {
        Router::new().nest(&state.config.api_base_uri, api)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .layer(axum::middleware::from_fn_with_state(client_limiter, rate_limit))
        .with_state(state)
}
