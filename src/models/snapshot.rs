//! Team snapshot scraped from the statistics page.

use serde::{Deserialize, Serialize};

/// Marker used when the ranking element is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Structured view of the team page at fetch time.
///
/// Every field is always present; missing page structure degrades to
/// [`NOT_AVAILABLE`] or an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub ranking: String,
    pub roster: Vec<String>,
    pub news: Vec<NewsLink>,
    pub upcoming_matches: Vec<UpcomingMatch>,
}

impl Default for TeamSnapshot {
    fn default() -> Self {
        Self {
            ranking: NOT_AVAILABLE.to_string(),
            roster: Vec::new(),
            news: Vec::new(),
            upcoming_matches: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsLink {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMatch {
    pub opponent: String,
    pub time: String,
    pub event_name: String,
    pub link: String,
}
