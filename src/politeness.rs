//! Politeness gate: robots.txt permission per origin plus minimum request spacing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use robotstxt::DefaultMatcher;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use url::Url;

use crate::fetcher::Fetcher;

#[async_trait]
pub trait Politeness: Send + Sync {
    /// Whether robots.txt lets `user_agent` fetch `url`. Fails open.
    async fn is_allowed(&self, url: &str, user_agent: &str) -> bool;

    /// Block until the minimum interval since the previous request has passed.
    async fn wait(&self);
}

#[derive(Debug)]
enum RobotsRules {
    /// robots.txt missing or unreachable.
    AllowAll,
    Body(String),
}

/// robots.txt bodies keyed by origin, shared by every site crawled in a run.
///
/// Each origin is loaded exactly once; concurrent callers for the same origin wait
/// on that single load.
pub struct RobotsCache {
    fetcher: Arc<dyn Fetcher>,
    origins: Mutex<HashMap<String, Arc<OnceCell<RobotsRules>>>>,
}

impl RobotsCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            origins: Mutex::new(HashMap::new()),
        }
    }

    pub async fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        let Some(origin) = Url::parse(url).ok().and_then(|u| origin_of(&u)) else {
            return true;
        };

        let cell = {
            let mut origins = self.origins.lock().await;
            origins.entry(origin.clone()).or_default().clone()
        };
        let rules = cell.get_or_init(|| self.load(&origin)).await;

        match rules {
            RobotsRules::AllowAll => true,
            RobotsRules::Body(body) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, user_agent, url)
            }
        }
    }

    #[cfg(test)]
    pub async fn cached_origins(&self) -> usize {
        self.origins.lock().await.len()
    }

    async fn load(&self, origin: &str) -> RobotsRules {
        let robots_url = format!("{origin}/robots.txt");
        match self.fetcher.fetch(&robots_url).await {
            Some(body) => {
                tracing::debug!(origin, "loaded robots.txt");
                RobotsRules::Body(body)
            }
            None => {
                tracing::debug!(origin, "robots.txt unavailable, allowing all");
                RobotsRules::AllowAll
            }
        }
    }
}

fn origin_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

/// Minimum spacing between consecutive requests.
///
/// The lock is held across the sleep so two callers can never both fire inside one
/// delay window.
pub struct RateLimiter {
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.delay).await;
        }
        *last = Some(Instant::now());
    }
}

/// Gate for one site: shared robots cache, site-local pacing.
pub struct PolitenessGate {
    robots: Arc<RobotsCache>,
    limiter: RateLimiter,
}

impl PolitenessGate {
    pub fn new(robots: Arc<RobotsCache>, delay: Duration) -> Self {
        Self {
            robots,
            limiter: RateLimiter::new(delay),
        }
    }
}

#[async_trait]
impl Politeness for PolitenessGate {
    async fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.robots.is_allowed(url, user_agent).await
    }

    async fn wait(&self) {
        self.limiter.wait().await;
    }
}

/// Gate that permits everything except an explicit deny list and never sleeps.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct OpenGate {
    denied: std::collections::HashSet<String>,
    waits: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl OpenGate {
    pub fn denying(urls: &[&str]) -> Self {
        Self {
            denied: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn waits(&self) -> usize {
        self.waits.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl Politeness for OpenGate {
    async fn is_allowed(&self, url: &str, _user_agent: &str) -> bool {
        !self.denied.contains(url)
    }

    async fn wait(&self) {
        self.waits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticFetcher;

    const ROBOTS: &str = "User-agent: *\nDisallow: /private/\n\nUser-agent: AcademicCrawler\nDisallow: /staff-only/\n";

    #[tokio::test]
    async fn test_robots_rules_per_agent() {
        let fetcher = Arc::new(StaticFetcher::new().with_page("https://uni.edu/robots.txt", ROBOTS));
        let cache = RobotsCache::new(fetcher);

        assert!(cache.is_allowed("https://uni.edu/people", "AcademicCrawler").await);
        assert!(!cache.is_allowed("https://uni.edu/staff-only/x", "AcademicCrawler").await);
        assert!(!cache.is_allowed("https://uni.edu/private/x", "OtherBot").await);
        assert!(cache.is_allowed("https://uni.edu/staff-only/x", "OtherBot").await);
    }

    #[tokio::test]
    async fn test_robots_fetched_once_per_origin() {
        let fetcher = Arc::new(StaticFetcher::new().with_page("https://uni.edu/robots.txt", ROBOTS));
        let cache = RobotsCache::new(fetcher.clone());

        for path in ["/a", "/b", "/private/c"] {
            cache.is_allowed(&format!("https://uni.edu{path}"), "AcademicCrawler").await;
        }
        cache.is_allowed("http://uni.edu/a", "AcademicCrawler").await;

        assert_eq!(fetcher.request_count("https://uni.edu/robots.txt"), 1);
        assert_eq!(fetcher.request_count("http://uni.edu/robots.txt"), 1);
        assert_eq!(cache.cached_origins().await, 2);
    }

    #[tokio::test]
    async fn test_missing_robots_fails_open() {
        let fetcher = Arc::new(StaticFetcher::new());
        let cache = RobotsCache::new(fetcher.clone());

        assert!(cache.is_allowed("https://uni.edu/private/x", "AcademicCrawler").await);
        assert!(cache.is_allowed("https://uni.edu/other", "AcademicCrawler").await);
        assert_eq!(fetcher.request_count("https://uni.edu/robots.txt"), 1);
        assert!(cache.is_allowed("not a url", "AcademicCrawler").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(Duration::from_millis(40));
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(40));
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_rate_limiter_serializes_concurrent_callers() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(30)));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move { limiter.wait().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_delay_does_not_sleep() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
