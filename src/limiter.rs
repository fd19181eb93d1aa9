//! 固定窗口限流
//!
//! 每个 key 一个窗口，首次访问时创建；窗口周期结束后计数整体清零。
//! 同一 key 的读改写都在该 key 的 map entry 下完成，不同 key 只在分片上偶有竞争。

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitWindow {
    pub request_count: u32,
    pub window_start: Instant,
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    name: &'static str,
    limit: u32,
    period: Duration,
    windows: DashMap<String, RateLimitWindow>,
}

impl FixedWindowLimiter {
    /// `limit = 0` 表示不限流
    pub fn new(name: &'static str, limit: u32, period: Duration) -> Self {
        Self {
            name,
            limit,
            period,
            windows: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 允许则占用当前窗口的一个名额并返回 `true`
    pub fn admit(&self, key: &str) -> bool {
        if self.limit == 0 {
            return true;
        }

        let now = Instant::now();
        let mut window = self
            .windows
            .entry(key.to_string())
            .or_insert(RateLimitWindow {
                request_count: 0,
                window_start: now,
            });

        if now.duration_since(window.window_start) >= self.period {
            window.request_count = 0;
            window.window_start = now;
        }

        if window.request_count >= self.limit {
            tracing::warn!(
                limiter = self.name,
                key,
                requests = window.request_count,
                "Rate limit exceeded"
            );
            return false;
        }

        window.request_count += 1;
        true
    }

    /// 清理已过期的窗口，返回清理数量
    pub fn sweep_expired(&self) -> usize {
        let before = self.windows.len();
        let now = Instant::now();
        let period = self.period;
        self.windows
            .retain(|_, w| now.duration_since(w.window_start) < period);
        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            tracing::debug!(limiter = self.name, removed, "Swept expired rate limit windows");
        }
        removed
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    pub fn window(&self, key: &str) -> Option<RateLimitWindow> {
        self.windows.get(key).map(|w| *w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn admits_exactly_limit_within_window() {
        let limiter = FixedWindowLimiter::new("test", 3, Duration::from_secs(60));

        assert!(limiter.admit("alice"));
        assert!(limiter.admit("alice"));
        assert!(limiter.admit("alice"));
        assert!(!limiter.admit("alice"));
        assert!(!limiter.admit("alice"));

        // 被拒绝的请求不计数
        assert_eq!(limiter.window("alice").unwrap().request_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn resets_once_period_elapses() {
        let limiter = FixedWindowLimiter::new("test", 2, Duration::from_secs(300));
        assert!(limiter.admit("u1"));
        assert!(limiter.admit("u1"));
        assert!(!limiter.admit("u1"));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(!limiter.admit("u1"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(limiter.admit("u1"));
        assert!(limiter.admit("u1"));
        assert!(!limiter.admit("u1"));
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let limiter = FixedWindowLimiter::new("test", 1, Duration::from_secs(60));
        assert!(limiter.admit("a"));
        assert!(!limiter.admit("a"));
        assert!(limiter.admit("b"));
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn zero_limit_disables() {
        let limiter = FixedWindowLimiter::new("test", 0, Duration::from_secs(60));
        for _ in 0..100 {
            assert!(limiter.admit("anyone"));
        }
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_only_expired_windows() {
        let limiter = FixedWindowLimiter::new("test", 5, Duration::from_secs(10));
        limiter.admit("old");
        tokio::time::advance(Duration::from_secs(6)).await;
        limiter.admit("fresh");
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(limiter.sweep_expired(), 1);
        assert!(limiter.window("old").is_none());
        assert!(limiter.window("fresh").is_some());
    }

    #[test]
    fn concurrent_callers_never_exceed_limit() {
        let limiter = Arc::new(FixedWindowLimiter::new("test", 50, Duration::from_secs(3600)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..20).filter(|_| limiter.admit("same")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }
}
