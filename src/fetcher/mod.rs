pub mod http_fetcher;

use async_trait::async_trait;
use url::Url;

use crate::app::{ReaderError, Result};

#[async_trait]
pub trait Fetcher {
    /// Retrieve the raw body behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Check that `input` is an absolute http(s) URL.
pub fn validate_feed_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ReaderError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_feed_url("https://rssexport.rbc.ru/rbcnews/news/30/full.rss").is_ok());
        assert!(validate_feed_url("http://x.com/feed").is_ok());
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(matches!(
            validate_feed_url("rssexport.rbc.ru/rbcnews"),
            Err(ReaderError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            validate_feed_url("ftp://x.com/feed"),
            Err(ReaderError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }
}
