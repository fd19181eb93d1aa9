use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use likes_backend::{
    AppState,
    config::Config,
    limiter::FixedWindowLimiter,
    router::create_router,
    routes::{
        article::PgArticleResolver,
        like::{LikeCoordinator, PgMembershipStore, RedisCountCache},
        user::PgUserResolver,
    },
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'likes_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 限流器：全局按地址限流，点赞按用户限流
    let client_limiter = Arc::new(FixedWindowLimiter::new(
        "client",
        config.rate_limit_requests,
        config.rate_limit_window(),
    ));
    let like_limiter = Arc::new(FixedWindowLimiter::new(
        "like",
        config.like_rate_limit_requests,
        config.like_rate_limit_window(),
    ));

    let articles = Arc::new(PgArticleResolver::new(pool.clone()));
    let mut likes = LikeCoordinator::new(
        Arc::new(PgMembershipStore::new(pool.clone())),
        articles.clone(),
        Arc::new(PgUserResolver::new(pool.clone())),
        like_limiter.clone(),
        config.like_count_cache_ttl(),
    );

    // Redis 不可用时直接关闭缓存，所有计数走数据库
    match config.redis_url.as_deref().map(redis::Client::open) {
        Some(Ok(client)) => {
            tracing::info!("Like count cache enabled");
            likes = likes.with_cache(Arc::new(RedisCountCache::new(
                Arc::new(client),
                config.cache_timeout(),
            )));
        }
        Some(Err(e)) => {
            tracing::warn!("Invalid REDIS_URL, like count cache disabled: {}", e);
        }
        None => {
            tracing::warn!("REDIS_URL not set, like count cache disabled");
        }
    }

    // 定期清理过期的限流窗口
    {
        let limiters = [client_limiter.clone(), like_limiter];
        let period = config.rate_limit_sweep_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                for limiter in &limiters {
                    limiter.sweep_expired();
                }
            }
        });
    }

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        likes: Arc::new(likes),
        articles,
    };

    let router = create_router(state.clone(), client_limiter);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
