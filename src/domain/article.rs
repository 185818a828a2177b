use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::app::{ReaderError, Result};

/// Sentinel stored in place of a missing optional field.
pub const UNKNOWN: &str = "unknown";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Publish date of an article, reduced to calendar-day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    Date(NaiveDate),
    Unknown,
}

impl Published {
    /// Parse the stored representation. Anything that is not an ISO date
    /// maps to [`Published::Unknown`].
    pub fn from_stored(s: &str) -> Self {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Published::Date)
            .unwrap_or(Published::Unknown)
    }
}

impl From<Option<NaiveDate>> for Published {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(Published::Date).unwrap_or(Published::Unknown)
    }
}

impl fmt::Display for Published {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Published::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Published::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for Published {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Published {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Published::from_stored(&s))
    }
}

/// A single news article as extracted from a feed and kept in the store.
///
/// Field order here is the field order of every rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Natural key. Two articles with the same link are the same article.
    pub link: String,
    /// Scheme and host of the feed the article was fetched from.
    pub source_origin: String,
    pub published: Published,
    pub description: String,
    pub category: String,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>, source_origin: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let link = link.into();

        if title.trim().is_empty() {
            return Err(ReaderError::MissingField("title"));
        }
        if link.trim().is_empty() {
            return Err(ReaderError::MissingField("link"));
        }

        Ok(Self {
            title,
            link,
            source_origin: source_origin.into(),
            published: Published::Unknown,
            description: UNKNOWN.to_string(),
            category: UNKNOWN.to_string(),
        })
    }

    pub fn with_published(mut self, published: Published) -> Self {
        self.published = published;
        self
    }

    /// Set the description; `None` or blank text keeps the sentinel.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = or_unknown(description);
        self
    }

    /// Set the category; `None` or blank text keeps the sentinel.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = or_unknown(category);
        self
    }

    /// `(name, value)` pairs in rendering order.
    pub fn fields(&self) -> [(&'static str, String); 6] {
        [
            ("title", self.title.clone()),
            ("link", self.link.clone()),
            ("source_origin", self.source_origin.clone()),
            ("published", self.published.to_string()),
            ("description", self.description.clone()),
            ("category", self.category.clone()),
        ]
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Derive the origin of a feed URL: everything before the third
/// `/`-delimited segment, e.g. `https://example.com/rss` -> `https://example.com`.
pub fn source_origin(url: &str) -> String {
    let url = url.trim();
    let mut segments = url.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(scheme), Some(""), Some(host)) if !host.is_empty() => format!("{}//{}", scheme, host),
        _ => url.trim_end_matches('/').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Article {
        Article::new("Title", "https://example.com/1", "https://example.com").unwrap()
    }

    #[test]
    fn test_new_defaults_to_unknown() {
        let article = sample();
        assert_eq!(article.published, Published::Unknown);
        assert_eq!(article.description, UNKNOWN);
        assert_eq!(article.category, UNKNOWN);
    }

    #[test]
    fn test_new_rejects_missing_title_or_link() {
        assert!(matches!(
            Article::new("  ", "https://example.com/1", "https://example.com"),
            Err(ReaderError::MissingField("title"))
        ));
        assert!(matches!(
            Article::new("Title", "", "https://example.com"),
            Err(ReaderError::MissingField("link"))
        ));
    }

    #[test]
    fn test_blank_optional_fields_keep_sentinel() {
        let article = sample()
            .with_description(Some("   ".into()))
            .with_category(None);
        assert_eq!(article.description, UNKNOWN);
        assert_eq!(article.category, UNKNOWN);
    }

    #[test]
    fn test_published_display() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(Published::Date(date).to_string(), "2024-01-01");
        assert_eq!(Published::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_published_from_stored() {
        assert_eq!(
            Published::from_stored("2019-10-20"),
            Published::Date(NaiveDate::from_ymd_opt(2019, 10, 20).unwrap())
        );
        assert_eq!(Published::from_stored("unknown"), Published::Unknown);
        assert_eq!(Published::from_stored("Empty"), Published::Unknown);
    }

    #[test]
    fn test_serialized_field_names() {
        let article = sample().with_published(Published::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        let value = serde_json::to_value(&article).unwrap();

        assert_eq!(value["title"], "Title");
        assert_eq!(value["source_origin"], "https://example.com");
        assert_eq!(value["published"], "2024-01-01");
        assert_eq!(value["category"], "unknown");
    }

    #[test]
    fn test_source_origin() {
        assert_eq!(source_origin("https://rssexport.rbc.ru/rbcnews/news/30/full.rss"), "https://rssexport.rbc.ru");
        assert_eq!(source_origin("http://x.com"), "http://x.com");
        assert_eq!(source_origin("http://x.com/"), "http://x.com");
        assert_eq!(source_origin("http://localhost:8080/feed"), "http://localhost:8080");
        assert_eq!(source_origin("not-a-url"), "not-a-url");
    }
}
