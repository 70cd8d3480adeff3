//! Page classification heuristics over normalized URLs and link text.

use scraper::{Html, Selector};
use url::Url;

use crate::normalize::{path_of, resolve};
use crate::site::SiteContext;

/// Path fragments of pages that often link onward to faculty listings.
const NAV_KEYWORDS: &[&str] = &["about", "academics", "research", "school", "department", "college"];

/// Substrings that rule a link out as an individual profile.
const PROFILE_BLOCKLIST: &[&str] = &[
    "login", "search", "contact", "about", "news", "events", "calendar", "resources", "apply",
    "admissions", "donate", ".pdf", ".doc", ".jpg", ".png", "mailto:", "tel:", "twitter",
    "facebook", "linkedin", "instagram",
];

const PAGINATION_INDICATORS: &[&str] = &["next", "page", "›", "»", ">"];

const MAX_PROFILE_SEGMENTS: usize = 5;

/// Read-only view of the listing pages known so far.
pub trait ListingLookup {
    fn is_known_listing(&self, url: &str) -> bool;
}

impl ListingLookup for std::collections::HashSet<String> {
    fn is_known_listing(&self, url: &str) -> bool {
        self.contains(url)
    }
}

/// Path contains any configured listing keyword (case-insensitive substring).
pub fn is_listing_page(url: &str, site: &SiteContext) -> bool {
    let path = path_of(url);
    site.listing_keywords.iter().any(|k| path.contains(k.as_str()))
}

/// Worth following while looking for listing pages.
pub fn might_lead_to_listing(url: &str, site: &SiteContext) -> bool {
    if is_listing_page(url, site) {
        return true;
    }
    let path = path_of(url);
    NAV_KEYWORDS.iter().any(|k| path.contains(k))
}

/// Looks like an individual profile: not a known listing, not utility/social/file,
/// and a path of 1 to 5 segments.
pub fn is_profile_link(url: &str, _link_text: &str, listings: &impl ListingLookup) -> bool {
    if listings.is_known_listing(url) {
        return false;
    }

    let path = path_of(url);
    let full = url.to_lowercase();
    if PROFILE_BLOCKLIST
        .iter()
        .any(|p| path.contains(p) || full.contains(p))
    {
        return false;
    }

    let segments = path.split('/').filter(|s| !s.is_empty()).count();
    (1..=MAX_PROFILE_SEGMENTS).contains(&segments)
}

/// Pagination links on `page` whose normalized targets are themselves listing pages,
/// in document order without duplicates.
pub fn find_pagination_links(document: &Html, page: &Url, site: &SiteContext) -> Vec<String> {
    let selector = anchor_selector();
    let mut found: Vec<String> = Vec::new();

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor
            .text()
            .collect::<String>()
            .trim()
            .to_lowercase();
        let href_lower = href.to_lowercase();

        let numbered = !text.is_empty() && text.chars().all(|c| c.is_ascii_digit());
        let indicated = PAGINATION_INDICATORS
            .iter()
            .any(|i| text.contains(i) || href_lower.contains(i));
        if !(numbered || indicated) {
            continue;
        }

        let Some(target) = resolve(page, href, site) else {
            continue;
        };
        if is_listing_page(&target, site) && !found.contains(&target) {
            found.push(target);
        }
    }

    found
}

pub fn anchor_selector() -> Selector {
    Selector::parse("a[href]").expect("static selector")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::site::test_site;

    fn site() -> SiteContext {
        test_site("https://uni.edu", &["faculty-profiles", "people"])
    }

    #[test]
    fn test_listing_detection() {
        let site = site();
        assert!(is_listing_page("https://uni.edu/people/directory", &site));
        assert!(is_listing_page("https://uni.edu/Engineering/PEOPLE", &site));
        // Substring match, no word boundary required.
        assert!(is_listing_page("https://uni.edu/peoplesoft", &site));
        assert!(!is_listing_page("https://uni.edu/news/2024", &site));
        assert!(!might_lead_to_listing("https://uni.edu/news/2024", &site));
    }

    #[test]
    fn test_navigation_candidates() {
        let site = site();
        assert!(might_lead_to_listing("https://uni.edu/academics", &site));
        assert!(might_lead_to_listing("https://uni.edu/schools/science", &site));
        assert!(might_lead_to_listing("https://uni.edu/people", &site));
        assert!(!might_lead_to_listing("https://uni.edu/alumni", &site));
        assert!(!might_lead_to_listing("https://uni.edu", &site));
    }

    #[test]
    fn test_profile_links() {
        let listings: HashSet<String> = ["https://uni.edu/people".to_string()].into();
        assert!(is_profile_link("https://uni.edu/faculty/jdoe", "Jane Doe", &listings));
        assert!(!is_profile_link("https://uni.edu/contact", "Contact", &listings));
        assert!(!is_profile_link("https://uni.edu/faculty/jdoe.pdf", "CV", &listings));
        assert!(!is_profile_link("https://uni.edu/people", "People", &listings));
        assert!(!is_profile_link("https://uni.edu/twitter-feed", "", &listings));
        assert!(!is_profile_link("https://uni.edu", "Home", &listings));
        assert!(is_profile_link("https://uni.edu/a/b/c/d/e", "", &listings));
        assert!(!is_profile_link("https://uni.edu/a/b/c/d/e/f", "", &listings));
    }

    #[test]
    fn test_pagination_digit_text_requires_listing_target() {
        let site = site();
        let page = Url::parse("https://uni.edu/people").unwrap();
        let html = Html::parse_document(
            r#"<div class="pager">
                 <a href="/people/2">2</a>
                 <a href="/archive/2">2</a>
               </div>"#,
        );
        assert_eq!(
            find_pagination_links(&html, &page, &site),
            vec!["https://uni.edu/people/2".to_string()]
        );
    }

    #[test]
    fn test_pagination_indicators() {
        let site = site();
        let page = Url::parse("https://uni.edu/people").unwrap();
        let html = Html::parse_document(
            r#"<a href="/people/list-b">Next &raquo;</a>
               <a href="/people?page=3">3</a>
               <a href="/people/page/4">more</a>
               <a href="/people/jdoe">Jane Doe</a>
               <a href="https://other.edu/people/page/2">next</a>
               <a href="/people/list-b">›</a>"#,
        );
        assert_eq!(
            find_pagination_links(&html, &page, &site),
            vec![
                "https://uni.edu/people/list-b".to_string(),
                "https://uni.edu/people".to_string(),
                "https://uni.edu/people/page/4".to_string(),
            ]
        );
    }
}
