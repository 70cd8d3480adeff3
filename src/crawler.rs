//! Two-phase discovery crawl within one site.
//! Phase 1: breadth-first search from the base URL for faculty listing pages.
//! Phase 2: breadth-first walk over listing pages and their pagination, collecting profile links.

use std::collections::{BTreeSet, HashSet, VecDeque};

use scraper::Html;
use serde::Serialize;
use url::Url;

use crate::classify::{
    anchor_selector, find_pagination_links, is_listing_page, is_profile_link,
    might_lead_to_listing, ListingLookup,
};
use crate::fetcher::Fetcher;
use crate::normalize::{normalize, resolve};
use crate::politeness::Politeness;
use crate::site::SiteContext;

/// Counters for everything the crawl skipped instead of failing on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub robots_skips: usize,
    pub normalization_rejections: usize,
    pub classification_misses: usize,
    pub pagination_links: usize,
}

/// Result of crawling one site.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Listing pages in discovery order.
    pub listing_pages: Vec<String>,
    pub profile_urls: BTreeSet<String>,
    pub stats: CrawlStats,
}

/// Append-only set of listing pages. Insertion order is stable, so the set can keep
/// growing while Phase 2 walks its own frontier.
#[derive(Debug, Default, Clone)]
pub struct ListingSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl ListingSet {
    /// Returns `true` if `url` was not already present.
    pub fn insert(&mut self, url: String) -> bool {
        if self.members.contains(&url) {
            return false;
        }
        self.members.insert(url.clone());
        self.order.push(url);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.members.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }
}

impl ListingLookup for ListingSet {
    fn is_known_listing(&self, url: &str) -> bool {
        self.contains(url)
    }
}

/// Anchor on a page: normalized target and visible text.
struct Link {
    url: String,
    text: String,
}

pub struct DiscoveryCrawler<'a> {
    site: &'a SiteContext,
    fetcher: &'a dyn Fetcher,
    gate: &'a dyn Politeness,
    listings: ListingSet,
    profiles: BTreeSet<String>,
    stats: CrawlStats,
}

impl<'a> DiscoveryCrawler<'a> {
    pub fn new(site: &'a SiteContext, fetcher: &'a dyn Fetcher, gate: &'a dyn Politeness) -> Self {
        Self {
            site,
            fetcher,
            gate,
            listings: ListingSet::default(),
            profiles: BTreeSet::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Run both phases. Never fails: whatever was found before a dead end is returned.
    pub async fn crawl(mut self) -> CrawlOutcome {
        tracing::info!(site = %self.site.base_url, max_depth = self.site.max_depth, "phase 1: finding listing pages");
        self.find_listing_pages().await;

        tracing::info!(listing_pages = self.listings.len(), "phase 2: collecting profile links");
        self.collect_profiles().await;

        tracing::info!(
            site = %self.site.base_url,
            listing_pages = self.listings.len(),
            profiles = self.profiles.len(),
            pages_fetched = self.stats.pages_fetched,
            fetch_failures = self.stats.fetch_failures,
            robots_skips = self.stats.robots_skips,
            normalization_rejections = self.stats.normalization_rejections,
            classification_misses = self.stats.classification_misses,
            "discovery finished"
        );

        CrawlOutcome {
            listing_pages: self.listings.order,
            profile_urls: self.profiles,
            stats: self.stats,
        }
    }

    async fn find_listing_pages(&mut self) {
        let Some(start) = normalize(self.site.base_url.as_str(), self.site) else {
            tracing::warn!(site = %self.site.base_url, "base url does not normalize onto its own domain");
            return;
        };

        let mut frontier: VecDeque<(String, u32)> = VecDeque::from([(start, 0)]);
        let mut visited: HashSet<String> = HashSet::new();

        while let Some((url, depth)) = frontier.pop_front() {
            if depth > self.site.max_depth || visited.contains(&url) {
                continue;
            }
            if !self.gate.is_allowed(&url, &self.site.robots_agent).await {
                tracing::debug!(%url, "blocked by robots.txt");
                self.stats.robots_skips += 1;
                continue;
            }
            visited.insert(url.clone());

            tracing::debug!(%url, depth, "phase 1: checking");
            self.gate.wait().await;
            let Some(body) = self.fetch(&url).await else {
                continue;
            };

            if is_listing_page(&url, self.site) && self.listings.insert(url.clone()) {
                tracing::info!(%url, "listing page found");
            }
            if depth >= self.site.max_depth {
                continue;
            }

            let links = {
                let document = Html::parse_document(&body);
                self.collect_links(&url, &document)
            };
            for link in links {
                if visited.contains(&link.url) {
                    continue;
                }
                if might_lead_to_listing(&link.url, self.site) {
                    frontier.push_back((link.url, depth + 1));
                } else {
                    self.stats.classification_misses += 1;
                }
            }
        }
    }

    async fn collect_profiles(&mut self) {
        let mut frontier: VecDeque<String> = self.listings.iter().cloned().collect();
        // Everything ever enqueued this phase; a page is never queued twice.
        let mut queued: HashSet<String> = frontier.iter().cloned().collect();
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(url) = frontier.pop_front() {
            if !visited.insert(url.clone()) {
                continue;
            }
            if !self.gate.is_allowed(&url, &self.site.robots_agent).await {
                tracing::debug!(%url, "blocked by robots.txt");
                self.stats.robots_skips += 1;
                continue;
            }

            tracing::debug!(%url, "phase 2: processing listing");
            self.gate.wait().await;
            let Some(body) = self.fetch(&url).await else {
                continue;
            };

            let (links, pagination) = {
                let document = Html::parse_document(&body);
                let page = Url::parse(&url).ok();
                let pagination = page
                    .as_ref()
                    .map(|p| find_pagination_links(&document, p, self.site))
                    .unwrap_or_default();
                (self.collect_links(&url, &document), pagination)
            };

            // Classified against the listings known before this page's pagination.
            let mut found = 0;
            for link in links {
                if !is_profile_link(&link.url, &link.text, &self.listings) {
                    self.stats.classification_misses += 1;
                    continue;
                }
                if self.profiles.insert(link.url) {
                    found += 1;
                }
            }
            tracing::debug!(%url, found, "profiles from listing page");

            for next in pagination {
                if visited.contains(&next) || !queued.insert(next.clone()) {
                    continue;
                }
                tracing::debug!(url = %next, "pagination page queued");
                self.stats.pagination_links += 1;
                self.listings.insert(next.clone());
                frontier.push_back(next);
            }
        }
    }

    async fn fetch(&mut self, url: &str) -> Option<String> {
        match self.fetcher.fetch(url).await {
            Some(body) => {
                self.stats.pages_fetched += 1;
                Some(body)
            }
            None => {
                tracing::debug!(url, "could not fetch");
                self.stats.fetch_failures += 1;
                None
            }
        }
    }

    /// Normalized same-site anchors of `document`, in document order.
    fn collect_links(&mut self, page_url: &str, document: &Html) -> Vec<Link> {
        let Ok(page) = Url::parse(page_url) else {
            return Vec::new();
        };
        let selector = anchor_selector();
        let mut links = Vec::new();

        for anchor in document.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            match resolve(&page, href, self.site) {
                Some(url) => links.push(Link {
                    url,
                    text: anchor.text().collect::<String>().trim().to_string(),
                }),
                None => self.stats.normalization_rejections += 1,
            }
        }

        links
    }
}
