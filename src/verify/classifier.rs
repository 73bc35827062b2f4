//! Keyword-heuristic content classification.
//!
//! One classifier serves OCR text from identity documents and the text of
//! fetched profile pages; only the keyword set differs.

use std::collections::BTreeSet;

use scraper::Html;

use crate::models::ClassificationResult;

/// Labels expected on an identity document.
pub const DOCUMENT_KEYWORDS: &[&str] = &["cpf", "nome", "nascimento"];

/// Generic eSports terms; the organization name is appended at runtime.
pub const ESPORTS_KEYWORDS: &[&str] = &["csgo", "valorant", "esports", "torneio"];

/// A lower-cased, de-duplicated keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: BTreeSet<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Keywords for OCR output of identity documents.
    pub fn documents() -> Self {
        Self::new(DOCUMENT_KEYWORDS)
    }

    /// Keywords for eSports-related pages, including the organization name.
    pub fn esports(org_name: &str) -> Self {
        Self::new(ESPORTS_KEYWORDS.iter().copied().chain([org_name]))
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Case-insensitive substring match of every keyword against `text`.
pub fn classify(text: &str, keywords: &KeywordSet) -> ClassificationResult {
    if text.trim().is_empty() || keywords.is_empty() {
        return ClassificationResult::rejected();
    }

    let haystack = text.to_lowercase();
    let matched = keywords
        .keywords
        .iter()
        .filter(|k| haystack.contains(k.as_str()))
        .cloned()
        .collect();

    ClassificationResult::from_matches(matched)
}

/// Text content of an HTML document, without tags, scripts or styles.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len() / 2);

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
        if hidden {
            continue;
        }
        let text = text.trim();
        if !text.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(text);
        }
    }

    out
}
