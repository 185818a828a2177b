use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::config::FetchConfig;
use crate::fetcher::{validate_feed_url, Fetcher};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = validate_feed_url(url)?;

        tracing::info!("Requesting {}", url);
        let response = self.client.get(url).send().await?;
        tracing::info!("Request status: {}", response.status());

        response.error_for_status_ref()?;

        let body = response.bytes().await?.to_vec();
        tracing::debug!("Received {} bytes", body.len());

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ReaderError;

    #[tokio::test]
    async fn test_invalid_url_fails_before_request() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();

        let err = fetcher.fetch("no url at all").await.unwrap_err();
        assert!(matches!(err, ReaderError::InvalidUrl(_)));

        let err = fetcher.fetch("file:///etc/hosts").await.unwrap_err();
        assert!(matches!(err, ReaderError::UnsupportedScheme(_)));
    }
}
