use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub like_rate_limit_window_secs: u64,
    pub like_rate_limit_requests: u32,
    pub like_count_cache_ttl_secs: u64,
    pub cache_timeout_ms: u64,
    pub rate_limit_sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            redis_url: None,
            jwt_secret: String::new(),
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            api_base_uri: "/api".into(),
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            like_rate_limit_window_secs: 300,
            like_rate_limit_requests: 10,
            like_count_cache_ttl_secs: 300,
            cache_timeout_ms: 500,
            rate_limit_sweep_interval_secs: 60,
        }
    }
}

// 可选配置项解析失败时回退到默认值
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or(env::VarError::NotPresent);
        let defaults = Config::default();

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_host: required("SERVER_HOST")?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            server_port: parse_or(lookup("SERVER_PORT"), defaults.server_port),
            api_base_uri: lookup("API_BASE_URI").unwrap_or(defaults.api_base_uri),
            rate_limit_window_secs: parse_or(
                lookup("RATE_LIMIT_WINDOW"),
                defaults.rate_limit_window_secs,
            ),
            rate_limit_requests: parse_or(
                lookup("RATE_LIMIT_REQUESTS"),
                defaults.rate_limit_requests,
            ),
            like_rate_limit_window_secs: parse_or(
                lookup("LIKE_RATE_LIMIT_WINDOW"),
                defaults.like_rate_limit_window_secs,
            ),
            like_rate_limit_requests: parse_or(
                lookup("LIKE_RATE_LIMIT_REQUESTS"),
                defaults.like_rate_limit_requests,
            ),
            like_count_cache_ttl_secs: parse_or(
                lookup("LIKE_COUNT_CACHE_TTL"),
                defaults.like_count_cache_ttl_secs,
            ),
            cache_timeout_ms: parse_or(lookup("CACHE_TIMEOUT_MS"), defaults.cache_timeout_ms),
            rate_limit_sweep_interval_secs: parse_or(
                lookup("RATE_LIMIT_SWEEP_INTERVAL"),
                defaults.rate_limit_sweep_interval_secs,
            ),
        })
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn like_rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.like_rate_limit_window_secs)
    }

    pub fn like_count_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.like_count_cache_ttl_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_interval_secs.max(1))
    }
}
