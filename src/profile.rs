//! Extracted faculty profile records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One faculty member, as far as the heuristics could tell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rank: Option<String>,
    pub department: Option<String>,
    pub interests: Option<BTreeSet<String>>,
    pub university: String,
    pub country: String,
    pub profile_url: String,
}

impl ProfileRecord {
    /// Records with neither a name nor an email are dropped before export.
    pub fn is_valid(&self) -> bool {
        self.name.is_some() || self.email.is_some()
    }

    pub fn with_site(mut self, university: &str, country: &str) -> Self {
        self.university = university.to_string();
        self.country = country.to_string();
        self
    }
}

/// Flat tabular row; column order is the export order.
#[derive(Debug, Serialize)]
pub struct ProfileRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub rank: &'a str,
    pub department: &'a str,
    pub interests: String,
    pub university: &'a str,
    pub country: &'a str,
    pub profile_url: &'a str,
}

impl<'a> From<&'a ProfileRecord> for ProfileRow<'a> {
    fn from(record: &'a ProfileRecord) -> Self {
        Self {
            name: record.name.as_deref().unwrap_or_default(),
            email: record.email.as_deref().unwrap_or_default(),
            rank: record.rank.as_deref().unwrap_or_default(),
            department: record.department.as_deref().unwrap_or_default(),
            interests: record
                .interests
                .as_ref()
                .map(|set| set.iter().cloned().collect::<Vec<_>>().join("; "))
                .unwrap_or_default(),
            university: &record.university,
            country: &record.country,
            profile_url: &record.profile_url,
        }
    }
}
