//! Data models for ingestion

use chrono::NaiveDateTime;
use cloner_common::{ContentCategory, LifecycleState};
use std::path::{Path, PathBuf};
use url::Url;

/// One media row moving through the pipeline
///
/// Materialised from the relational store at the start of a run and mutated
/// in place by each step; dropped when the run ends.
#[derive(Debug, Clone)]
pub struct Item {
    pub file_id: i64,
    pub post_id: i64,
    pub external_url: Url,

    pub content_category: Option<ContentCategory>,
    /// `Content-Type` as served; empty when the source sent none
    pub mime_type: String,
    /// Extension with its leading dot, e.g. `.png`
    pub file_extension: Option<String>,
    pub byte_size: Option<u64>,

    pub local_artifact_name: Option<String>,
    pub local_path: Option<PathBuf>,
    pub storage_reference: Option<String>,

    pub state: LifecycleState,
    pub attempts: i64,
    pub created_at: NaiveDateTime,
    pub modified_at: Option<NaiveDateTime>,
}

impl Item {
    pub fn new(
        file_id: i64,
        post_id: i64,
        external_url: Url,
        created_at: NaiveDateTime,
        attempts: i64,
    ) -> Self {
        Self {
            file_id,
            post_id,
            external_url,
            content_category: None,
            mime_type: String::new(),
            file_extension: None,
            byte_size: None,
            local_artifact_name: None,
            local_path: None,
            storage_reference: None,
            state: LifecycleState::Pending,
            attempts,
            created_at,
            modified_at: None,
        }
    }

    /// Name and path of the staged local copy, once fetched
    pub fn staged(&self) -> Option<(&str, &Path)> {
        match (&self.local_artifact_name, &self.local_path) {
            (Some(name), Some(path)) => Some((name.as_str(), path.as_path())),
            _ => None,
        }
    }

    /// Size as written to the store; unknown lengths are stored as `-1`
    pub fn recorded_size(&self) -> i64 {
        self.byte_size
            .and_then(|n| i64::try_from(n).ok())
            .unwrap_or(-1)
    }
}

/// `{unix_timestamp}.{file_id}.{post_id}{extension}`
///
/// The timestamp keeps names unique across runs that retry the same item.
pub fn artifact_name(unix_timestamp: i64, file_id: i64, post_id: i64, extension: &str) -> String {
    format!("{}.{}.{}{}", unix_timestamp, file_id, post_id, extension)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_encodes_time_and_identity() {
        assert_eq!(artifact_name(1_700_000_000, 42, 9, ".png"), "1700000000.42.9.png");
    }

    #[test]
    fn test_recorded_size() {
        let mut item = Item::new(
            1,
            2,
            Url::parse("https://example.com/a.gif").unwrap(),
            chrono::Utc::now().naive_utc(),
            0,
        );
        assert_eq!(item.recorded_size(), -1);

        item.byte_size = Some(2048);
        assert_eq!(item.recorded_size(), 2048);
    }

    #[test]
    fn test_staged_requires_name_and_path() {
        let mut item = Item::new(
            1,
            2,
            Url::parse("https://example.com/a.gif").unwrap(),
            chrono::Utc::now().naive_utc(),
            0,
        );
        assert!(item.staged().is_none());

        item.local_artifact_name = Some("1.1.2.gif".to_string());
        assert!(item.staged().is_none());

        item.local_path = Some(PathBuf::from("/tmp/1.1.2.gif"));
        assert_eq!(item.staged().unwrap().0, "1.1.2.gif");
    }
}
