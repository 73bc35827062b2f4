//! Where the team page HTML comes from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::errors::AppError;

/// Browser-like agent; the statistics site rejects obvious bots.
const USER_AGENT: &str = "Mozilla/5.0";

/// A remote HTML document the snapshot cache can (re)fetch.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<String, AppError>;
}

/// Fetches the team page over HTTP.
pub struct HttpPageSource {
    client: Client,
    url: String,
}

impl HttpPageSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self) -> Result<String, AppError> {
        tracing::info!(url = %self.url, "Fetching team page");
        let body = self
            .client
            .get(&self.url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}
