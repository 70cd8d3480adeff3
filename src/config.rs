//! Crawl configuration: crawler settings, path rewrite rules, target universities.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "AcademicCrawler/1.0 (Academic Collaboration; non-commercial)";
pub const DEFAULT_ROBOTS_AGENT: &str = "AcademicCrawler";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerSettings,
    /// Ordered path substring replacements.
    #[serde(default)]
    pub rewrite: Vec<RewriteRuleConfig>,
    #[serde(default)]
    pub universities: Vec<University>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// Link hops from the base URL explored while looking for listing pages.
    pub max_depth: u32,
    /// Minimum spacing between two requests to the same site.
    pub delay_seconds: f64,
    pub timeout_seconds: u64,
    /// Sent as the HTTP `User-Agent` header.
    pub user_agent: String,
    /// Identity matched against robots.txt groups.
    pub robots_agent: String,
    pub max_concurrent_sites: usize,
    /// Path substrings marking a faculty listing page.
    pub listing_keywords: Vec<String>,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            delay_seconds: 3.0,
            timeout_seconds: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            robots_agent: DEFAULT_ROBOTS_AGENT.to_string(),
            max_concurrent_sites: 1,
            listing_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRuleConfig {
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub country: String,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    /// Lower-case the listing keywords and check every field, reporting all problems at once.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.crawler.listing_keywords = self
            .crawler
            .listing_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let mut errors = Vec::new();
        let crawler = &self.crawler;
        if crawler.timeout_seconds == 0 {
            errors.push("crawler.timeout_seconds must be positive".to_string());
        }
        if crawler.max_concurrent_sites == 0 {
            errors.push("crawler.max_concurrent_sites must be at least 1".to_string());
        }
        if !crawler.delay_seconds.is_finite() || crawler.delay_seconds < 0.0 {
            errors.push("crawler.delay_seconds must be a non-negative number".to_string());
        }
        if crawler.robots_agent.trim().is_empty() {
            errors.push("crawler.robots_agent must not be empty".to_string());
        }
        for (i, rule) in self.rewrite.iter().enumerate() {
            if rule.from.is_empty() {
                errors.push(format!("rewrite[{i}].from must not be empty"));
            }
        }
        if self.universities.is_empty() {
            errors.push("at least one [[universities]] entry is required".to_string());
        }
        for uni in &self.universities {
            match Url::parse(&uni.url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
                _ => errors.push(format!(
                    "university '{}' has an invalid url '{}'",
                    uni.name, uni.url
                )),
            }
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[crawler]
max_depth = 3
delay_seconds = 0.5
listing_keywords = ["Faculty-Profiles", " people "]

[[rewrite]]
from = "/en/"
to = "/"

[[rewrite]]
from = "/index"

[[universities]]
name = "Example University"
url = "https://www.example.edu"
country = "Egypt"
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let config = config.validated().unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.delay_seconds, 0.5);
        assert_eq!(config.crawler.timeout_seconds, 15);
        assert_eq!(config.crawler.robots_agent, DEFAULT_ROBOTS_AGENT);
        assert_eq!(config.crawler.listing_keywords, vec!["faculty-profiles", "people"]);
        assert_eq!(config.rewrite.len(), 2);
        assert_eq!(config.rewrite[1].to, "");
        assert_eq!(config.universities[0].country, "Egypt");
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let raw = r#"
[crawler]
timeout_seconds = 0
delay_seconds = -1.0
max_concurrent_sites = 0

[[rewrite]]
from = ""

[[universities]]
name = "Broken"
url = "ftp://files.example.edu"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        match config.validated() {
            Err(ConfigError::Invalid(errors)) => assert_eq!(errors.len(), 5),
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_universities_rejected() {
        let config: Config = toml::from_str("[crawler]\nmax_depth = 1\n").unwrap();
        assert!(matches!(config.validated(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/faculty-crawler.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
