//! Team snapshot endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::TeamSnapshot;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheCleared {
    pub message: String,
}

/// GET /team-snapshot - Current team snapshot, served through the cache.
pub async fn get_team_snapshot(
    State(state): State<AppState>,
) -> Result<Json<TeamSnapshot>, AppError> {
    let snapshot = state.snapshots.get().await?;
    Ok(Json(snapshot))
}

/// GET /cache/invalidate - Drop the cached snapshot.
pub async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheCleared> {
    state.snapshots.invalidate().await;
    Json(CacheCleared {
        message: "Cache cleared".to_string(),
    })
}
