//! Database repository for fan records.
//!
//! Records are insert-only; the only read used for verification is the
//! lookup by normalized national id.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{CreateFanRequest, DocumentRef, FanRecord, ProfileLink, SocialProfiles};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== FAN OPERATIONS ====================

    /// Find a fan by normalized national id.
    pub async fn find_fan_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<FanRecord>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, national_id, address, interests, events_attended, purchases, created_at FROM fans WHERE national_id = ?"
        )
        .bind(national_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(fan_from_row))
    }

    /// Get a fan by ID.
    pub async fn get_fan(&self, id: i64) -> Result<Option<FanRecord>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, national_id, address, interests, events_attended, purchases, created_at FROM fans WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(fan_from_row))
    }

    /// Get a fan by ID or fail with `NotFound`.
    pub async fn require_fan(&self, id: i64) -> Result<FanRecord, AppError> {
        self.get_fan(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fan {} not found", id)))
    }

    /// Insert a fan. `national_id` must already be normalized and validated.
    pub async fn create_fan(
        &self,
        request: &CreateFanRequest,
        national_id: &str,
    ) -> Result<FanRecord, AppError> {
        let now = Utc::now().to_rfc3339();
        let name = request.name.trim();

        let result = sqlx::query(
            "INSERT INTO fans (name, national_id, address, interests, events_attended, purchases, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(name)
        .bind(national_id)
        .bind(&request.address)
        .bind(&request.interests)
        .bind(&request.events_attended)
        .bind(&request.purchases)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(FanRecord {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            national_id: national_id.to_string(),
            address: request.address.clone(),
            interests: request.interests.clone(),
            events_attended: request.events_attended.clone(),
            purchases: request.purchases.clone(),
            created_at: now,
        })
    }

    // ==================== LINKED ENTITIES ====================

    /// Insert or replace the social handles of a fan.
    pub async fn save_social_profiles(
        &self,
        profiles: &SocialProfiles,
    ) -> Result<SocialProfiles, AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO social_profiles (fan_id, instagram, twitter, youtube, updated_at) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(fan_id) DO UPDATE SET instagram = excluded.instagram, twitter = excluded.twitter, youtube = excluded.youtube, updated_at = excluded.updated_at"
        )
        .bind(profiles.fan_id)
        .bind(&profiles.instagram)
        .bind(&profiles.twitter)
        .bind(&profiles.youtube)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(profiles.clone())
    }

    /// Get the social handles of a fan, if any were saved.
    pub async fn get_social_profiles(
        &self,
        fan_id: i64,
    ) -> Result<Option<SocialProfiles>, AppError> {
        let row = sqlx::query(
            "SELECT fan_id, instagram, twitter, youtube FROM social_profiles WHERE fan_id = ?",
        )
        .bind(fan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| SocialProfiles {
            fan_id: row.get("fan_id"),
            instagram: row.get("instagram"),
            twitter: row.get("twitter"),
            youtube: row.get("youtube"),
        }))
    }

    /// Store a profile link that passed validation.
    pub async fn save_profile_link(
        &self,
        fan_id: i64,
        url: &str,
        matched_keywords: &[String],
    ) -> Result<ProfileLink, AppError> {
        let now = Utc::now().to_rfc3339();
        let keywords_json = serde_json::to_string(matched_keywords)?;

        let result = sqlx::query(
            "INSERT INTO profile_links (fan_id, url, matched_keywords, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(fan_id)
        .bind(url)
        .bind(&keywords_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ProfileLink {
            id: result.last_insert_rowid(),
            fan_id,
            url: url.to_string(),
            matched_keywords: matched_keywords.to_vec(),
            created_at: now,
        })
    }

    /// List the validated links of a fan, oldest first.
    pub async fn list_profile_links(&self, fan_id: i64) -> Result<Vec<ProfileLink>, AppError> {
        let rows = sqlx::query(
            "SELECT id, fan_id, url, matched_keywords, created_at FROM profile_links WHERE fan_id = ? ORDER BY id",
        )
        .bind(fan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProfileLink {
                id: row.get("id"),
                fan_id: row.get("fan_id"),
                url: row.get("url"),
                matched_keywords: parse_json_array(row.get("matched_keywords")),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Store a reference to an accepted identity document.
    pub async fn save_document(
        &self,
        fan_id: i64,
        document_path: &str,
        matched_keywords: &[String],
    ) -> Result<DocumentRef, AppError> {
        let now = Utc::now().to_rfc3339();
        let keywords_json = serde_json::to_string(matched_keywords)?;

        let result = sqlx::query(
            "INSERT INTO documents (fan_id, document_path, matched_keywords, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(fan_id)
        .bind(document_path)
        .bind(&keywords_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(DocumentRef {
            id: result.last_insert_rowid(),
            fan_id,
            document_path: document_path.to_string(),
            matched_keywords: matched_keywords.to_vec(),
            created_at: now,
        })
    }

    /// List the accepted documents of a fan, oldest first.
    pub async fn list_documents(&self, fan_id: i64) -> Result<Vec<DocumentRef>, AppError> {
        let rows = sqlx::query(
            "SELECT id, fan_id, document_path, matched_keywords, created_at FROM documents WHERE fan_id = ? ORDER BY id",
        )
        .bind(fan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DocumentRef {
                id: row.get("id"),
                fan_id: row.get("fan_id"),
                document_path: row.get("document_path"),
                matched_keywords: parse_json_array(row.get("matched_keywords")),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

// ==================== ROW MAPPERS ====================

fn fan_from_row(row: &sqlx::sqlite::SqliteRow) -> FanRecord {
    FanRecord {
        id: row.get("id"),
        name: row.get("name"),
        national_id: row.get("national_id"),
        address: row.get("address"),
        interests: row.get("interests"),
        events_attended: row.get("events_attended"),
        purchases: row.get("purchases"),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
