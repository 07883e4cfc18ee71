//! Local artifact cleanup

use tracing::{debug, warn};

use super::models::Item;
use crate::error::CleanupError;

/// Removes staged copies once their item has been retrieved
#[derive(Debug, Clone, Default)]
pub struct LocalArtifactJanitor;

impl LocalArtifactJanitor {
    pub fn new() -> Self {
        Self
    }

    pub async fn cleanup(&self, item: &Item) -> Result<(), CleanupError> {
        let (_, path) = item.staged().ok_or(CleanupError::NotStaged(item.file_id))?;

        tokio::fs::remove_file(path).await?;

        debug!(file_id = item.file_id, "Removed {}", path.display());

        Ok(())
    }

    /// Clean every item, logging failures; returns how many were removed
    pub async fn sweep(&self, items: &[Item]) -> usize {
        let mut removed = 0;

        for item in items {
            match self.cleanup(item).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(file_id = item.file_id, "Cleanup failed: {}", e),
            }
        }

        removed
    }
}
