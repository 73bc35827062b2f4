//! Fan registration endpoints.
//!
//! Every call after registration is scoped by the fan id in the path.

use axum::extract::State;

use super::{success, ApiResult, AppJson, AppPath};
use crate::errors::AppError;
use crate::models::{
    CreateFanRequest, DocumentRef, FanRecord, ProfileLink, SocialProfiles, SubmissionOutcome,
    SubmitDocumentRequest, SubmitLinkRequest,
};
use crate::verify::{classify, identity};
use crate::AppState;

/// POST /api/fans - Register a fan after checksum and duplicate checks.
pub async fn create_fan(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateFanRequest>,
) -> ApiResult<FanRecord> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let national_id = identity::validate_new_fan(&state.repo, &request.national_id).await?;
    let fan = state.repo.create_fan(&request, &national_id).await?;

    tracing::info!(fan_id = fan.id, "Fan registered");
    success(fan)
}

/// GET /api/fans/:id - Get a single fan.
pub async fn get_fan(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<FanRecord> {
    success(state.repo.require_fan(id).await?)
}

/// GET /api/fans/:id/social-profiles - Saved social handles.
pub async fn get_social_profiles(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<SocialProfiles> {
    state.repo.require_fan(id).await?;

    let profiles = state.repo.get_social_profiles(id).await?.unwrap_or(SocialProfiles {
        fan_id: id,
        ..Default::default()
    });
    success(profiles)
}

/// PUT /api/fans/:id/social-profiles - Save social handles.
pub async fn save_social_profiles(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<SocialProfiles>,
) -> ApiResult<SocialProfiles> {
    state.repo.require_fan(id).await?;

    let profiles = SocialProfiles {
        fan_id: id,
        instagram: non_blank(request.instagram),
        twitter: non_blank(request.twitter),
        youtube: non_blank(request.youtube),
    };
    success(state.repo.save_social_profiles(&profiles).await?)
}

/// POST /api/fans/:id/documents - Classify OCR text and keep the document if it
/// looks like an identity document.
pub async fn submit_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<SubmitDocumentRequest>,
) -> ApiResult<SubmissionOutcome<DocumentRef>> {
    state.repo.require_fan(id).await?;

    if request.document_path.trim().is_empty() {
        return Err(AppError::Validation("documentPath is required".to_string()));
    }

    let result = classify(&request.ocr_text, &state.document_keywords);
    let matched = result.keywords();

    if !result.accepted {
        tracing::warn!(fan_id = id, "Document text has no identity labels");
        return success(SubmissionOutcome {
            accepted: false,
            matched_keywords: matched,
            record: None,
            warning: Some("Document may not contain valid data".to_string()),
        });
    }

    let document = state
        .repo
        .save_document(id, request.document_path.trim(), &matched)
        .await?;
    tracing::info!(fan_id = id, document_id = document.id, "Document accepted");

    success(SubmissionOutcome {
        accepted: true,
        matched_keywords: matched,
        record: Some(document),
        warning: None,
    })
}

/// GET /api/fans/:id/documents - Accepted documents.
pub async fn list_documents(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Vec<DocumentRef>> {
    state.repo.require_fan(id).await?;
    success(state.repo.list_documents(id).await?)
}

/// POST /api/fans/:id/links - Fetch a profile page and keep it if it is
/// eSports related. Fetch failures are reported, not treated as rejection.
pub async fn submit_link(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<SubmitLinkRequest>,
) -> ApiResult<SubmissionOutcome<ProfileLink>> {
    state.repo.require_fan(id).await?;

    let url = request.url.trim();
    let result = state.links.validate(url).await?;
    let matched = result.keywords();

    if !result.accepted {
        return success(SubmissionOutcome {
            accepted: false,
            matched_keywords: matched,
            record: None,
            warning: Some("Content does not appear to be eSports related".to_string()),
        });
    }

    let link = state.repo.save_profile_link(id, url, &matched).await?;
    success(SubmissionOutcome {
        accepted: true,
        matched_keywords: matched,
        record: Some(link),
        warning: None,
    })
}

/// GET /api/fans/:id/links - Validated profile links.
pub async fn list_links(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Vec<ProfileLink>> {
    state.repo.require_fan(id).await?;
    success(state.repo.list_profile_links(id).await?)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().trim_start_matches('@').to_string())
        .filter(|v| !v.is_empty())
}
