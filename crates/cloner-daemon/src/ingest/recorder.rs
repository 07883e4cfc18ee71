//! Item state recorder

use chrono::{Timelike, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::Item;
use crate::db::{ItemRepository, OutcomeRecord};
use crate::error::RecordError;

/// Writes an item's outcome back to the relational store
///
/// This is the only path that advances the attempt counter.
#[derive(Clone)]
pub struct ItemStateRecorder {
    repo: Arc<dyn ItemRepository>,
}

impl ItemStateRecorder {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    /// Persist `item` and mirror the attempt bump in memory on success
    #[instrument(skip(self, item), fields(file_id = item.file_id, state = %item.state))]
    pub async fn record(&self, item: &mut Item) -> Result<(), RecordError> {
        let now = Utc::now().naive_utc();
        let modified_at = now.with_nanosecond(0).unwrap_or(now);

        let outcome = OutcomeRecord {
            file_id: item.file_id,
            mime_type: item.mime_type.clone(),
            file_size: item.recorded_size(),
            storage_reference: item.storage_reference.clone().unwrap_or_default(),
            state: item.state,
            modified_at,
        };

        self.repo.record_outcome(&outcome).await?;

        item.attempts += 1;
        item.modified_at = Some(modified_at);

        debug!(attempts = item.attempts, "Recorded outcome");

        Ok(())
    }
}
