use serde::{Deserialize, Serialize};

/// Object store settings, keyed as in the `aws` block of the config file
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Free-form provider label, used only in logs
    #[serde(default)]
    pub name: String,
    /// Access key; empty means use the default AWS credential chain
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
    /// Custom endpoint for S3-compatible providers; empty means AWS
    #[serde(default)]
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    /// Top-level key prefix; objects land under `/{folder}/{YYYYMMDD}/`
    pub folder: String,
    /// Canned ACL applied to every upload, e.g. `public-read`
    pub acl: String,
    #[serde(default)]
    pub path_style: bool,
}

impl StorageConfig {
    pub fn endpoint(&self) -> Option<&str> {
        Some(self.endpoint.as_str()).filter(|e| !e.is_empty())
    }

    pub fn has_static_credentials(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.region.is_empty() {
            return Err("Object store region cannot be empty".to_string());
        }
        if self.bucket.is_empty() {
            return Err("Object store bucket cannot be empty".to_string());
        }
        if self.folder.is_empty() {
            return Err("Object store folder cannot be empty".to_string());
        }
        if self.acl.is_empty() {
            return Err("Object store ACL cannot be empty".to_string());
        }
        if let Some(endpoint) = self.endpoint() {
            url::Url::parse(endpoint)
                .map_err(|e| format!("Invalid object store endpoint '{}': {}", endpoint, e))?;
        }
        if self.key.is_empty() != self.secret.is_empty() {
            return Err("Object store key and secret must be set together".to_string());
        }

        Ok(())
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("name", &self.name)
            .field("credentials", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("folder", &self.folder)
            .field("acl", &self.acl)
            .field("path_style", &self.path_style)
            .finish()
    }
}
