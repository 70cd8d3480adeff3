//! Per-site crawl context.

use std::time::Duration;

use url::Url;

use crate::config::{CrawlerSettings, RewriteRuleConfig};

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("invalid base url '{0}': {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("base url '{0}' must be http(s) with a host")]
    Unsupported(String),
}

/// Literal substring replacement applied to URL paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl From<&RewriteRuleConfig> for RewriteRule {
    fn from(rule: &RewriteRuleConfig) -> Self {
        Self {
            from: rule.from.clone(),
            to: rule.to.clone(),
        }
    }
}

/// Immutable configuration for crawling one site. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub base_url: Url,
    /// `host[:port]`; normalized URLs must match it exactly.
    pub domain: String,
    pub max_depth: u32,
    /// Lower-case listing path keywords.
    pub listing_keywords: Vec<String>,
    pub min_delay: Duration,
    pub rewrite_rules: Vec<RewriteRule>,
    pub robots_agent: String,
}

impl SiteContext {
    pub fn new(
        base_url: &str,
        settings: &CrawlerSettings,
        rewrite_rules: &[RewriteRuleConfig],
    ) -> Result<Self, SiteError> {
        let parsed =
            Url::parse(base_url).map_err(|e| SiteError::InvalidUrl(base_url.to_string(), e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SiteError::Unsupported(base_url.to_string()));
        }
        let domain = netloc(&parsed).ok_or_else(|| SiteError::Unsupported(base_url.to_string()))?;

        Ok(Self {
            base_url: parsed,
            domain,
            max_depth: settings.max_depth,
            listing_keywords: settings
                .listing_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            min_delay: Duration::from_secs_f64(settings.delay_seconds.max(0.0)),
            rewrite_rules: rewrite_rules.iter().map(RewriteRule::from).collect(),
            robots_agent: settings.robots_agent.clone(),
        })
    }
}

/// `host[:port]` of a URL; the port only appears when it is not the scheme default.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
pub(crate) fn test_site(base: &str, keywords: &[&str]) -> SiteContext {
    let settings = CrawlerSettings {
        max_depth: 2,
        delay_seconds: 0.0,
        listing_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..CrawlerSettings::default()
    };
    SiteContext::new(base, &settings, &[]).expect("test site url")
}
