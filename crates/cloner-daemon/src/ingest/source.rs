//! Pending item listing

use std::sync::Arc;
use tracing::{info, instrument};

use super::models::Item;
use crate::db::ItemRepository;
use crate::error::RunError;

/// Lists the work for one run: pending rows inside the recency window
#[derive(Clone)]
pub struct PendingItemSource {
    repo: Arc<dyn ItemRepository>,
    window_hours: u32,
}

impl PendingItemSource {
    pub fn new(repo: Arc<dyn ItemRepository>, window_hours: u32) -> Self {
        Self { repo, window_hours }
    }

    /// Newest first; a listing failure abandons the run
    #[instrument(skip(self), fields(window_hours = self.window_hours))]
    pub async fn list_pending(&self) -> Result<Vec<Item>, RunError> {
        let items = self.repo.list_pending(self.window_hours).await?;

        info!("Found {} pending items", items.len());

        Ok(items)
    }
}
