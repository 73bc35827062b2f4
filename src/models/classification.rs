//! Keyword classification result.

use std::collections::BTreeSet;

use serde::Serialize;

/// Outcome of a keyword classification. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub accepted: bool,
    pub matched_keywords: BTreeSet<String>,
}

impl ClassificationResult {
    pub fn from_matches(matched_keywords: BTreeSet<String>) -> Self {
        Self {
            accepted: !matched_keywords.is_empty(),
            matched_keywords,
        }
    }

    pub fn rejected() -> Self {
        Self::default()
    }

    pub fn keywords(&self) -> Vec<String> {
        self.matched_keywords.iter().cloned().collect()
    }
}
