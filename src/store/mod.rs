pub mod sqlite;

use chrono::NaiveDate;

use crate::app::{ReaderError, Result};
use crate::domain::Article;

pub use sqlite::SqliteStore;

pub trait Store {
    /// Insert articles whose link is not stored yet; existing links are left
    /// untouched. Returns the number of rows inserted.
    fn upsert(&self, articles: &[Article]) -> Result<usize>;

    /// Articles published on `date`, optionally restricted to one source
    /// origin, in storage order and capped at `limit`.
    ///
    /// Fails with [`ReaderError::NoMatchingNews`] when nothing matches.
    fn query(&self, date: NaiveDate, source_origin: Option<&str>, limit: usize) -> Result<Vec<Article>>;

    fn count(&self) -> Result<usize>;
}

/// Parse a date given on the command line.
///
/// Accepts the compact `YYYYMMDD` form as well as ISO `YYYY-MM-DD`.
pub fn parse_query_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .map_err(|_| ReaderError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_date_compact() {
        assert_eq!(
            parse_query_date("20191020").unwrap(),
            NaiveDate::from_ymd_opt(2019, 10, 20).unwrap()
        );
    }

    #[test]
    fn test_parse_query_date_iso() {
        assert_eq!(
            parse_query_date("2024-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_query_date_invalid() {
        for input in ["2019", "20191340", "yesterday", ""] {
            assert!(
                matches!(parse_query_date(input), Err(ReaderError::InvalidDate(_))),
                "expected invalid date for {:?}",
                input
            );
        }
    }
}
