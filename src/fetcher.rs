//! Page fetching. Every failure collapses to `None`.

#[cfg(test)]
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Body of `url`, or `None` on any network error, timeout or non-200 status.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// `reqwest`-backed fetcher with a fixed user agent and per-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "fetch failed");
                return None;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!(url, status = %response.status(), "non-success status");
            return None;
        }
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to read body");
                None
            }
        }
    }
}

/// In-memory fetcher serving fixed pages and recording every request.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

#[cfg(test)]
#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned()
    }
}
