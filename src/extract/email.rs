//! Email extraction from `mailto:` links and `.edu` addresses in page text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static EDU_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.+-]+@(?:[A-Za-z0-9-]+\.)*[A-Za-z0-9-]+\.edu\b").expect("email regex")
});

/// First `mailto:` target in document order, else the first `.edu` address in `text`.
pub fn extract_email(document: &Html, text: &str) -> Option<String> {
    let selector = Selector::parse("a[href]").expect("static selector");
    for anchor in document.select(&selector) {
        let href = anchor.value().attr("href").unwrap_or_default().trim();
        let Some(target) = strip_mailto(href) else {
            continue;
        };
        let address = target.split('?').next().unwrap_or_default().trim();
        if !address.is_empty() {
            return Some(address.to_string());
        }
    }

    EDU_EMAIL.find(text).map(|m| m.as_str().to_string())
}

fn strip_mailto(href: &str) -> Option<&str> {
    let prefix = href.get(..7)?;
    prefix.eq_ignore_ascii_case("mailto:").then(|| &href[7..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::visible_text;

    fn email_of(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        extract_email(&document, &text)
    }

    #[test]
    fn test_mailto_preferred_over_text() {
        assert_eq!(
            email_of(
                r#"<p>other@uni.edu</p><a href="/cv">CV</a>
                   <a href="MAILTO:jdoe@gmail.com?subject=Hi">Email</a>"#
            )
            .as_deref(),
            Some("jdoe@gmail.com")
        );
    }

    #[test]
    fn test_empty_mailto_skipped() {
        assert_eq!(
            email_of(r#"<a href="mailto:">x</a><a href="mailto:a.b@cs.uni.edu">y</a>"#).as_deref(),
            Some("a.b@cs.uni.edu")
        );
    }

    #[test]
    fn test_text_requires_edu_host() {
        assert_eq!(email_of("<p>jane@school.edu</p>").as_deref(), Some("jane@school.edu"));
        assert_eq!(
            email_of("<p>Reach me: info@company.com or j.doe@eng.school.edu.</p>").as_deref(),
            Some("j.doe@eng.school.edu")
        );
        assert_eq!(email_of("<p>jane@school.education</p>"), None);
        assert_eq!(email_of("<p>jane@gmail.com</p>"), None);
    }

    #[test]
    fn test_script_text_ignored() {
        assert_eq!(email_of("<script>var e = 'bot@spam.edu';</script><p>none</p>"), None);
    }
}
