//! Fan registration models.

use serde::{Deserialize, Serialize};

/// A registered fan. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanRecord {
    pub id: i64,
    pub name: String,
    /// Digits only, checksum-valid and unique across all fans.
    pub national_id: String,
    pub address: String,
    pub interests: String,
    pub events_attended: String,
    pub purchases: String,
    pub created_at: String,
}

/// Request body for registering a new fan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFanRequest {
    pub name: String,
    /// As typed by the user; punctuation is stripped before validation.
    pub national_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub events_attended: String,
    #[serde(default)]
    pub purchases: String,
}

/// Social media handles linked to a fan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfiles {
    #[serde(default)]
    pub fan_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// An external profile page that passed link validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLink {
    pub id: i64,
    pub fan_id: i64,
    pub url: String,
    pub matched_keywords: Vec<String>,
    pub created_at: String,
}

/// Request body for submitting a profile link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLinkRequest {
    pub url: String,
}

/// A stored identity document whose OCR text looked plausible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: i64,
    pub fan_id: i64,
    pub document_path: String,
    pub matched_keywords: Vec<String>,
    pub created_at: String,
}

/// Request body for submitting a document. The OCR step runs client side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDocumentRequest {
    pub document_path: String,
    #[serde(default)]
    pub ocr_text: String,
}

/// Outcome of a classified submission. `record` is present only when accepted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome<T: Serialize> {
    pub accepted: bool,
    pub matched_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
