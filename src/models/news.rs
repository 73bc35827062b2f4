//! News fetch results.

use serde::{Deserialize, Serialize};

/// Maximum number of summaries returned per fetch.
pub const MAX_NEWS_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub title: String,
    pub url: String,
}

/// Result of a news fetch with language fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsOutcome {
    /// Articles found in `language` (the primary or the fallback one).
    Found {
        language: String,
        articles: Vec<NewsSummary>,
    },
    /// Neither language returned anything.
    NoResults,
}

/// JSON shape of [`NewsOutcome`]; `language` is null when nothing was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub language: Option<String>,
    pub articles: Vec<NewsSummary>,
}

impl From<NewsOutcome> for NewsResponse {
    fn from(outcome: NewsOutcome) -> Self {
        match outcome {
            NewsOutcome::Found { language, articles } => Self {
                language: Some(language),
                articles,
            },
            NewsOutcome::NoResults => Self {
                language: None,
                articles: Vec::new(),
            },
        }
    }
}
