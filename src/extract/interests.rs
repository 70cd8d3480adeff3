//! Research interests listed under a heading.

use std::collections::BTreeSet;

use scraper::{ElementRef, Html, Selector};

use crate::text::element_text;

const INTEREST_KEYWORDS: &[&str] = &[
    "research interests",
    "areas of interest",
    "research focus",
    "research areas",
];

/// Checked in order; only the first one present in a section is used.
const SEPARATORS: &[char] = &[',', ';', '•', '|'];

/// Interest phrases from the element following each "Research Interests"-style heading.
pub fn extract_interests(document: &Html) -> Option<BTreeSet<String>> {
    let selector = Selector::parse("h2, h3, strong, b").expect("static selector");
    let mut interests = BTreeSet::new();

    for heading in document.select(&selector) {
        let label = element_text(&heading).to_lowercase();
        if !INTEREST_KEYWORDS.iter().any(|k| label.contains(k)) {
            continue;
        }
        let Some(section) = heading.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        interests.extend(split_interests(&element_text(&section)));
    }

    (!interests.is_empty()).then_some(interests)
}

pub fn split_interests(text: &str) -> Vec<String> {
    if let Some(&sep) = SEPARATORS.iter().find(|&&sep| text.contains(sep)) {
        return text
            .split(sep)
            .map(str::trim)
            .filter(|t| t.chars().count() > 3)
            .map(str::to_string)
            .collect();
    }

    let whole = text.trim();
    if whole.chars().count() > 5 {
        vec![whole.to_string()]
    } else {
        Vec::new()
    }
}
