//! News endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;

use super::AppQuery;
use crate::errors::AppError;
use crate::models::NewsResponse;
use crate::AppState;

/// Optional language overrides.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// GET /news - Latest news, falling back to the secondary language when the
/// primary one has nothing.
pub async fn get_news(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NewsQuery>,
) -> Result<Json<NewsResponse>, AppError> {
    let Some(fetcher) = state.news.as_ref() else {
        return Err(AppError::Unavailable(
            "News API key is not configured".to_string(),
        ));
    };

    let primary = query
        .primary
        .as_deref()
        .unwrap_or(&state.config.news_primary_lang);
    let secondary = query
        .secondary
        .as_deref()
        .unwrap_or(&state.config.news_secondary_lang);

    let outcome = fetcher.fetch_news(primary, secondary).await?;
    Ok(Json(outcome.into()))
}
