//! URL normalization: canonical, de-duplicable `scheme://host/path` strings scoped to one site.

use url::Url;

use crate::site::{netloc, SiteContext};

/// Rewrite passes per URL. A rule can expose a new match for itself or an earlier
/// rule (`/en/en/` under `/en/` -> `/`), so passes repeat until the path is stable.
const MAX_REWRITE_PASSES: usize = 8;

/// Canonicalize `url` for `site`, or `None` if it is not http(s) or leaves the site's domain.
///
/// Query and fragment are dropped, trailing slashes stripped and the site's rewrite
/// rules applied to the path in order, repeatedly until nothing changes.
pub fn normalize(url: &str, site: &SiteContext) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    normalize_url(&parsed, site)
}

/// Resolve `href` against the page it appeared on, then normalize.
pub fn resolve(page: &Url, href: &str, site: &SiteContext) -> Option<String> {
    let absolute = page.join(href.trim()).ok()?;
    normalize_url(&absolute, site)
}

pub fn normalize_url(url: &Url, site: &SiteContext) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if netloc(url)? != site.domain {
        return None;
    }

    let mut path = canonical_path(url.path());
    for _ in 0..MAX_REWRITE_PASSES {
        let rewritten = canonical_path(&apply_rewrites(&path, site));
        if rewritten == path {
            break;
        }
        path = rewritten;
    }

    Some(format!("{}://{}{}", url.scheme(), site.domain, path))
}

/// One ordered pass of the site's rewrite rules.
fn apply_rewrites(path: &str, site: &SiteContext) -> String {
    site.rewrite_rules
        .iter()
        .fold(path.to_string(), |path, rule| path.replace(&rule.from, &rule.to))
}

/// No trailing slash; a leading one unless the path is empty.
fn canonical_path(path: &str) -> String {
    let path = path.trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Lower-cased path of an already normalized URL.
pub fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default()
}
