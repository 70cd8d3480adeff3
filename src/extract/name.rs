//! Name extraction: first heading, else the page title.

use scraper::{Html, Selector};

use crate::text::{collapse_whitespace, element_text};

/// First non-empty `h1`, else `h2`, else the `<title>` up to its first `|`.
pub fn extract_name(document: &Html) -> Option<String> {
    for tag in ["h1", "h2"] {
        let selector = Selector::parse(tag).expect("static selector");
        if let Some(heading) = document.select(&selector).next() {
            let text = element_text(&heading);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    let selector = Selector::parse("title").expect("static selector");
    let title = document.select(&selector).next()?.text().collect::<String>();
    let name = collapse_whitespace(title.split('|').next().unwrap_or_default());
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(html: &str) -> Option<String> {
        extract_name(&Html::parse_document(html))
    }

    #[test]
    fn test_heading_priority() {
        assert_eq!(
            name_of("<title>T</title><h2>Second</h2><h1>Jane <em>Doe</em></h1>").as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(name_of("<title>T</title><h2> Ahmed  Ali </h2>").as_deref(), Some("Ahmed Ali"));
    }

    #[test]
    fn test_empty_h1_falls_through() {
        assert_eq!(
            name_of("<h1><img src='logo.png'></h1><h2>Mona Zaki</h2>").as_deref(),
            Some("Mona Zaki")
        );
    }

    #[test]
    fn test_title_truncated_at_pipe() {
        assert_eq!(
            name_of("<head><title>Dr. Sara Kamal | Faculty | Uni</title></head><p>bio</p>").as_deref(),
            Some("Dr. Sara Kamal")
        );
        assert_eq!(name_of("<title>| Uni</title>"), None);
        assert_eq!(name_of("<p>no headings</p>"), None);
    }
}
