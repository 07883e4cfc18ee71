//! Object store uploader

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::instrument;

use super::models::Item;
use crate::error::UploadError;
use crate::storage::{config::StorageConfig, ObjectStore, PutObject};

/// `/{folder}/{YYYYMMDD}/{name}`
pub fn object_key(folder: &str, date: NaiveDate, name: &str) -> String {
    format!("/{}/{}/{}", folder, date.format("%Y%m%d"), name)
}

/// Moves staged artifacts into the object store under date-partitioned keys
#[derive(Clone)]
pub struct ObjectStoreUploader {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    folder: String,
    acl: String,
}

impl ObjectStoreUploader {
    pub fn new(store: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            folder: config.folder.clone(),
            acl: config.acl.clone(),
        }
    }

    /// Upload the staged copy of `item` and return its object key
    ///
    /// The date partition is taken from the clock at upload time.
    #[instrument(skip(self, item), fields(file_id = item.file_id))]
    pub async fn upload(&self, item: &Item) -> Result<String, UploadError> {
        let (name, path) = item.staged().ok_or(UploadError::NotStaged(item.file_id))?;
        let key = object_key(&self.folder, Utc::now().date_naive(), name);

        self.store
            .put_object(PutObject {
                bucket: self.bucket.clone(),
                key: key.clone(),
                path: path.to_path_buf(),
                acl: self.acl.clone(),
                content_type: item.mime_type.clone(),
            })
            .await?;

        Ok(key)
    }
}
