use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use thiserror::Error;

pub const DEFAULT_FEED_URL: &str = "https://celestrak.org/SOCRATES/search-results.php";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),
    #[error("feed returned HTTP {0}")]
    Status(u16),
    #[error("feed request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else {
            FeedError::Network(err.to_string())
        }
    }
}

/// Delimited conjunction report for one tracked object.
#[async_trait]
pub trait ConjunctionFeedSource: Send + Sync {
    async fn fetch_feed(&self, norad_id: u32) -> Result<String, FeedError>;
}

/// CelesTrak SOCRATES search results.
pub struct SocratesClient {
    http: reqwest::Client,
    feed_url: String,
}

impl SocratesClient {
    pub fn new(feed_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            feed_url: feed_url.to_string(),
        })
    }
}

#[async_trait]
impl ConjunctionFeedSource for SocratesClient {
    async fn fetch_feed(&self, norad_id: u32) -> Result<String, FeedError> {
        let response = self
            .http
            .get(&self.feed_url)
            .query(&[("IDENT", norad_id)])
            .header(ACCEPT, "text/csv")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
