//! Profile link validation: fetch a user-submitted page and classify its text.

use std::time::Duration;

use reqwest::{Client, Url};

use super::classifier::{classify, visible_text, KeywordSet};
use crate::errors::AppError;
use crate::models::ClassificationResult;

/// Bytes of a profile page that are read; the rest is ignored.
const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Fetches profile pages and checks them against the eSports keyword set.
#[derive(Clone)]
pub struct LinkValidator {
    client: Client,
    keywords: KeywordSet,
}

impl LinkValidator {
    pub fn new(timeout: Duration, keywords: KeywordSet) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, keywords })
    }

    /// Classify the page at `raw_url`.
    ///
    /// A fetch failure is a transport error, not a rejection.
    pub async fn validate(&self, raw_url: &str) -> Result<ClassificationResult, AppError> {
        let url = parse_http_url(raw_url)?;

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = MAX_PAGE_BYTES - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!(%url, "Profile page truncated at {} bytes", MAX_PAGE_BYTES);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        let html = String::from_utf8_lossy(&body);
        let result = classify(&visible_text(&html), &self.keywords);
        if result.accepted {
            tracing::info!(%url, matched = ?result.matched_keywords, "Profile link accepted");
        } else {
            tracing::warn!(%url, "Profile link does not look eSports related");
        }
        Ok(result)
    }
}

fn parse_http_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Validation(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}
