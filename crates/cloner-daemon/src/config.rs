//! Configuration management
//!
//! Configuration is read once at start-up from a JSON file and overlaid with
//! `CLONER_`-prefixed environment variables (nested keys separated by `__`,
//! e.g. `CLONER_INGEST__WINDOW_HOURS=4`).

use cloner_common::{ClonerError, Result};
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::config::IngestConfig;
use crate::storage::config::StorageConfig;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "CLONER_CONFIG";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CLONER_";

/// Default MySQL port when `server` carries no port.
pub const DEFAULT_DATABASE_PORT: u16 = 3306;

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub db: DatabaseConfig,
    /// Base URL of the search index core, e.g. `http://solr:8983/solr/posts`
    pub solr: String,
    pub aws: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Relational store connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(rename = "pass")]
    pub password: String,
    /// `host` or `host:port`
    pub server: String,
    #[serde(rename = "dbName", alias = "dbname", alias = "db_name")]
    pub db_name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_DATABASE_MAX_CONNECTIONS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS
}

impl DatabaseConfig {
    /// Split `server` into host and port
    pub fn host_and_port(&self) -> Result<(String, u16)> {
        match self.server.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| {
                    ClonerError::config(format!("Invalid database port in '{}'", self.server))
                })?;
                Ok((host.to_string(), port))
            },
            None => Ok((self.server.clone(), DEFAULT_DATABASE_PORT)),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .field("db_name", &self.db_name)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from the file named by `CLONER_CONFIG` (or the
    /// default path) plus environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        if !path.exists() {
            return Err(ClonerError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        Self::from_figment(Self::figment(&path))
    }

    /// Layered provider: JSON file first, environment on top
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .map_err(|e| ClonerError::config(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.db.server.is_empty() {
            return Err(ClonerError::config("Database server cannot be empty"));
        }
        if self.db.db_name.is_empty() {
            return Err(ClonerError::config("Database name cannot be empty"));
        }
        if self.db.max_connections == 0 {
            return Err(ClonerError::config(
                "Database max_connections must be greater than 0",
            ));
        }
        self.db.host_and_port()?;

        if self.solr.is_empty() {
            return Err(ClonerError::config("Search index base URL cannot be empty"));
        }
        url::Url::parse(&self.solr).map_err(|e| {
            ClonerError::config(format!("Invalid search index URL '{}': {}", self.solr, e))
        })?;

        self.aws.validate().map_err(ClonerError::Config)?;
        self.ingest.validate().map_err(ClonerError::Config)?;

        Ok(())
    }
}
