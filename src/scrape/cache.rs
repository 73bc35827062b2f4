//! Single-entry read-through cache for the team snapshot.
//!
//! The lock is never held while fetching, so two requests that both see an
//! expired entry will both refetch. Both results are equivalent and the last
//! write wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::parser::PageParser;
use super::source::PageSource;
use crate::errors::AppError;
use crate::models::TeamSnapshot;

struct CacheEntry {
    value: TeamSnapshot,
    fetched_at: Instant,
}

/// Team snapshot cache with a fixed time-to-live.
pub struct SnapshotCache {
    source: Arc<dyn PageSource>,
    parser: PageParser,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn PageSource>, parser: PageParser, ttl: Duration) -> Self {
        Self {
            source,
            parser,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Return the cached snapshot, refetching when it is missing or expired.
    ///
    /// A failed fetch propagates and leaves the cache as it was.
    pub async fn get(&self) -> Result<TeamSnapshot, AppError> {
        if let Some(entry) = self.entry.read().await.as_ref() {
            let age = entry.fetched_at.elapsed();
            if age < self.ttl {
                tracing::debug!(age_secs = age.as_secs(), "Team snapshot cache hit");
                return Ok(entry.value.clone());
            }
        }

        tracing::debug!("Team snapshot cache miss");
        let html = self.source.fetch().await?;
        let value = self.parser.parse(&html);

        *self.entry.write().await = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached entry; the next `get` refetches.
    pub async fn invalidate(&self) {
        if self.entry.write().await.take().is_some() {
            tracing::info!("Team snapshot cache cleared");
        }
    }
}
