//! News lookup with a second-language fallback.
//!
//! The primary language is tried first. Only an empty result set moves on to
//! the secondary language; a transport failure on either attempt is returned
//! to the caller as is.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{NewsOutcome, NewsSummary, MAX_NEWS_ITEMS};

/// A searchable news provider, queried one language at a time.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Most recent articles first.
    async fn search(&self, language: &str) -> Result<Vec<NewsSummary>, AppError>;
}

/// Client for a NewsAPI-compatible `everything` endpoint.
pub struct NewsApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    query: String,
}

#[derive(Debug, Deserialize)]
struct ArticlesPage {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
}

impl From<RawArticle> for NewsSummary {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| "Untitled".to_string()),
            url: raw.url.unwrap_or_default(),
        }
    }
}

impl NewsApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        query: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            query: query.into(),
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn search(&self, language: &str) -> Result<Vec<NewsSummary>, AppError> {
        let page: ArticlesPage = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", self.query.as_str()),
                ("language", language),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(page
            .articles
            .into_iter()
            .take(MAX_NEWS_ITEMS)
            .map(NewsSummary::from)
            .collect())
    }
}

/// Runs the primary/secondary language fallback over a [`NewsSource`].
#[derive(Clone)]
pub struct NewsFetcher {
    source: Arc<dyn NewsSource>,
}

impl NewsFetcher {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_news(
        &self,
        primary_lang: &str,
        secondary_lang: &str,
    ) -> Result<NewsOutcome, AppError> {
        for language in [primary_lang, secondary_lang] {
            let mut articles = self.source.search(language).await?;
            if !articles.is_empty() {
                articles.truncate(MAX_NEWS_ITEMS);
                tracing::info!(language, count = articles.len(), "News found");
                return Ok(NewsOutcome::Found {
                    language: language.to_string(),
                    articles,
                });
            }
            tracing::debug!(language, "No news in language");
        }
        Ok(NewsOutcome::NoResults)
    }
}
