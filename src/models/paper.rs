// file: src/models/paper.rs
// description: paper metadata as returned by the search api
// reference: internal data structures

use chrono::{DateTime, NaiveDate, Utc};
use std::hash::{Hash, Hasher};

/// A fetched paper. Identity is the source-assigned `id`.
#[derive(Debug, Clone)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub link: String,
    pub published: DateTime<Utc>,
}

impl Paper {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        authors: Vec<String>,
        link: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            authors,
            link: link.into(),
            published,
        }
    }

    pub fn published_date(&self) -> NaiveDate {
        self.published.date_naive()
    }

    pub fn authors_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown".to_string()
        } else {
            self.authors.join(", ")
        }
    }

    pub fn is_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.published && self.published <= end
    }
}

impl PartialEq for Paper {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Paper {}

impl Hash for Paper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn paper(id: &str, title: &str) -> Paper {
        Paper::new(
            id,
            title,
            "abstract",
            vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            format!("https://arxiv.org/abs/{}", id),
            Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_equality_uses_identifier_only() {
        assert_eq!(paper("2501.01234v1", "First"), paper("2501.01234v1", "Renamed"));
        assert_ne!(paper("2501.01234v1", "Same"), paper("2501.09999v1", "Same"));
    }

    #[test]
    fn test_authors_line() {
        assert_eq!(paper("a", "t").authors_line(), "Ada Lovelace, Alan Turing");
        let mut anonymous = paper("a", "t");
        anonymous.authors.clear();
        assert_eq!(anonymous.authors_line(), "Unknown");
    }

    #[test]
    fn test_is_within_inclusive_bounds() {
        let p = paper("a", "t");
        assert!(p.is_within(p.published, p.published));
        assert!(!p.is_within(p.published + Duration::seconds(1), p.published + Duration::days(1)));
        assert_eq!(p.published_date().to_string(), "2025-01-15");
    }
}
