//! Per-university driver: discover profile URLs, fetch each, extract, keep valid records.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;

use crate::config::{Config, University};
use crate::crawler::{CrawlStats, DiscoveryCrawler};
use crate::extract::extract_profile;
use crate::fetcher::Fetcher;
use crate::politeness::{Politeness, PolitenessGate, RobotsCache};
use crate::profile::ProfileRecord;
use crate::site::SiteContext;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteSummary {
    pub university: String,
    pub listing_pages: usize,
    pub profile_urls: usize,
    pub records_kept: usize,
    /// Pages with neither a name nor an email.
    pub records_rejected: usize,
    pub profile_fetch_failures: usize,
    pub profile_robots_skips: usize,
    pub crawl: CrawlStats,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub records: Vec<ProfileRecord>,
    pub summaries: Vec<SiteSummary>,
}

/// Crawl every configured university, at most `max_concurrent_sites` at a time.
///
/// One robots cache serves the whole run; each site paces its own requests.
/// Results come back in configuration order.
pub async fn run(config: &Config, fetcher: Arc<dyn Fetcher>) -> RunReport {
    let robots = Arc::new(RobotsCache::new(fetcher.clone()));
    let sem = Arc::new(Semaphore::new(config.crawler.max_concurrent_sites.max(1)));
    let mut join_set = tokio::task::JoinSet::new();

    for (position, university) in config.universities.iter().enumerate() {
        let site = match SiteContext::new(&university.url, &config.crawler, &config.rewrite) {
            Ok(site) => site,
            Err(e) => {
                tracing::error!(university = %university.name, error = %e, "skipping university");
                continue;
            }
        };

        let Ok(permit) = sem.clone().acquire_owned().await else {
            break;
        };
        let university = university.clone();
        let fetcher = fetcher.clone();
        let robots = robots.clone();
        join_set.spawn(async move {
            let _permit = permit;
            let result = process_site(&university, &site, fetcher.as_ref(), robots).await;
            (position, result)
        });
    }

    let mut finished = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(done) => finished.push(done),
            Err(e) => tracing::error!(error = %e, "site task failed"),
        }
    }
    finished.sort_by_key(|(position, _)| *position);

    let mut report = RunReport::default();
    for (_, (records, summary)) in finished {
        report.records.extend(records);
        report.summaries.push(summary);
    }
    tracing::info!(
        universities = report.summaries.len(),
        records = report.records.len(),
        "run complete"
    );
    report
}

/// Discover and extract one university's profiles. Never fails; an unreachable site
/// simply yields nothing.
pub async fn process_site(
    university: &University,
    site: &SiteContext,
    fetcher: &dyn Fetcher,
    robots: Arc<RobotsCache>,
) -> (Vec<ProfileRecord>, SiteSummary) {
    tracing::info!(university = %university.name, country = %university.country, url = %site.base_url, "crawling university");

    let gate = PolitenessGate::new(robots, site.min_delay);
    let outcome = DiscoveryCrawler::new(site, fetcher, &gate).crawl().await;

    let mut summary = SiteSummary {
        university: university.name.clone(),
        listing_pages: outcome.listing_pages.len(),
        profile_urls: outcome.profile_urls.len(),
        crawl: outcome.stats,
        ..Default::default()
    };

    if outcome.profile_urls.is_empty() {
        tracing::warn!(
            university = %university.name,
            listing_pages = summary.listing_pages,
            "no profiles found; listing keywords may not match the site, robots.txt may block the crawler, or pages may be rendered client-side"
        );
        return (Vec::new(), summary);
    }

    let total = outcome.profile_urls.len();
    let mut records = Vec::new();
    for (i, url) in outcome.profile_urls.iter().enumerate() {
        if (i + 1) % 10 == 0 {
            tracing::info!(university = %university.name, processed = i + 1, total, "extraction progress");
        }
        if !gate.is_allowed(url, &site.robots_agent).await {
            summary.profile_robots_skips += 1;
            continue;
        }
        gate.wait().await;
        let Some(html) = fetcher.fetch(url).await else {
            summary.profile_fetch_failures += 1;
            continue;
        };

        let record = extract_profile(&html, url);
        if !record.is_valid() {
            tracing::debug!(%url, "no name or email, dropping");
            summary.records_rejected += 1;
            continue;
        }
        if records.len() < 3 {
            tracing::info!(
                name = record.name.as_deref().unwrap_or("N/A"),
                email = record.email.as_deref().unwrap_or("N/A"),
                rank = record.rank.as_deref().unwrap_or("N/A"),
                department = record.department.as_deref().unwrap_or("N/A"),
                "profile extracted"
            );
        }
        records.push(record.with_site(&university.name, &university.country));
    }

    summary.records_kept = records.len();
    tracing::info!(
        university = %university.name,
        listing_pages = summary.listing_pages,
        profiles = summary.profile_urls,
        kept = summary.records_kept,
        rejected = summary.records_rejected,
        fetch_failures = summary.profile_fetch_failures,
        "university complete"
    );
    (records, summary)
}
