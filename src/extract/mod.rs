//! Heuristic field extraction from profile pages.
//!
//! Each extractor looks at the parsed document (or its visible text) on its own;
//! none depends on another's output.

pub mod department;
pub mod email;
pub mod interests;
pub mod name;
pub mod rank;

use scraper::Html;

pub use department::extract_department;
pub use email::extract_email;
pub use interests::extract_interests;
pub use name::extract_name;
pub use rank::extract_rank;

use crate::profile::ProfileRecord;
use crate::text::visible_text;

/// Run every extractor over `html`. University and country are left for the caller.
pub fn extract_profile(html: &str, url: &str) -> ProfileRecord {
    let document = Html::parse_document(html);
    let text = visible_text(&document);

    ProfileRecord {
        name: extract_name(&document),
        email: extract_email(&document, &text),
        rank: extract_rank(&text),
        department: extract_department(&text),
        interests: extract_interests(&document),
        profile_url: url.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANE: &str = "<h1>Jane Doe</h1><p>jane@school.edu</p><p>Associate Professor</p>\
        <p>Department of Physics</p><h3>Research Interests</h3><p>quantum computing, optics</p>";

    #[test]
    fn test_full_profile() {
        let record = extract_profile(JANE, "https://school.edu/people/jdoe");
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane@school.edu"));
        assert_eq!(record.rank.as_deref(), Some("Associate Professor"));
        assert_eq!(record.department.as_deref(), Some("Physics"));
        assert_eq!(
            record.interests,
            Some(["quantum computing".to_string(), "optics".to_string()].into())
        );
        assert_eq!(record.profile_url, "https://school.edu/people/jdoe");
        assert!(record.is_valid());
    }

    #[test]
    fn test_removing_interest_heading_leaves_other_fields() {
        let without = JANE.replace("<h3>Research Interests</h3>", "");
        let a = extract_profile(JANE, "u");
        let b = extract_profile(&without, "u");
        assert_eq!(a.name, b.name);
        assert_eq!(a.email, b.email);
        assert_eq!(a.rank, b.rank);
        assert_eq!(a.department, b.department);
        assert_eq!(b.interests, None);
    }

    #[test]
    fn test_adjacent_inline_elements() {
        let record = extract_profile(
            "<div><span>Professor</span><span>Department of Physics</span></div>",
            "u",
        );
        assert_eq!(record.rank.as_deref(), Some("Professor"));
        assert_eq!(record.department.as_deref(), Some("Physics"));
    }

    #[test]
    fn test_empty_page_is_invalid() {
        let record = extract_profile("<div><img src='x.png'></div>", "u");
        assert_eq!(record, ProfileRecord { profile_url: "u".into(), ..Default::default() });
        assert!(!record.is_valid());
    }
}
