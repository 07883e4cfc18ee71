//! Common types used across the media cloner

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ClonerError;

/// Lifecycle of a media row in the relational store
///
/// `Pending` is the only state the cloner selects on. `Retrieved` and `Failed`
/// are terminal; nothing ever moves a row back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Pending,
    Retrieved,
    Failed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Pending => "pending",
            LifecycleState::Retrieved => "retrieved",
            LifecycleState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleState {
    type Err = ClonerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(LifecycleState::Pending),
            "retrieved" => Ok(LifecycleState::Retrieved),
            "failed" => Ok(LifecycleState::Failed),
            other => Err(ClonerError::InvalidState(other.to_string())),
        }
    }
}

/// Coarse classification of fetched content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Image,
    #[default]
    Other,
}

impl ContentCategory {
    /// Classify from a MIME type, falling back to the file extension
    pub fn classify(mime_type: &str, extension: Option<&str>) -> Self {
        if mime_type.starts_with("image/") {
            return ContentCategory::Image;
        }

        match extension.map(|ext| ext.trim_start_matches('.').to_lowercase()) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => ContentCategory::Image,
            _ => ContentCategory::Other,
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentCategory::Image => write!(f, "image"),
            ContentCategory::Other => write!(f, "other"),
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Map a `Content-Type` value to the extension used for staged files.
///
/// The table is exact: parameters such as `; charset=` are not stripped and
/// anything outside the three supported image types yields `None`.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        _ => None,
    }
}

/// Extension (with leading dot) of the last segment of a URL path
pub fn extension_from_path(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next().unwrap_or_default();

    Path::new(last_segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
}
