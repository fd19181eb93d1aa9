use std::sync::Arc;

use config::Config;
use routes::article::ArticleResolver;
use routes::like::LikeCoordinator;

pub mod config;
pub mod error;
pub mod limiter;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub likes: Arc<LikeCoordinator>,
    pub articles: Arc<dyn ArticleResolver>,
}
