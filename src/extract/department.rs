//! Department, school, faculty or college name.

use std::sync::LazyLock;

use regex::Regex;

static DEPARTMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["Department", "Faculty", "School", "College"]
        .iter()
        .map(|unit| Regex::new(&format!(r"(?i){unit} of ([A-Za-z &]+)")).expect("department regex"))
        .collect()
});

/// Name following the first of `Department of`, `Faculty of`, `School of`,
/// `College of` that matches, tried in that order.
pub fn extract_department(text: &str) -> Option<String> {
    DEPARTMENT_PATTERNS.iter().find_map(|pattern| {
        let name = pattern.captures(text)?.get(1)?.as_str().trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
