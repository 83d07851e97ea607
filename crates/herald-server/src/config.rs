//! Configuration management for the herald server.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use herald_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("herald.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use std::path::Path;
use std::sync::Arc;

use config::{Config, ConfigError, Environment, File, FileFormat};
use herald_domain::{AuthorizationRequirement, RepositoryConfig};
use herald_storage::{
    MemoryKeyValueStore, StorageError, StorageResult, DEFAULT_MAX_REQUEST_LENGTH,
};
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Table storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Group-membership authorization settings
    #[serde(default)]
    pub authorization: AuthorizationSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Table storage settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend type. Only "memory" is available.
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Table holding team data
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Partition the team data repository is bound to
    #[serde(default = "default_partition_key")]
    pub partition_key: String,

    /// Create the table on startup if missing
    #[serde(default = "default_true")]
    pub ensure_table_exists: bool,

    /// Maximum encoded filter length accepted by the store
    #[serde(default = "default_max_request_length")]
    pub max_request_length: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            table_name: default_table_name(),
            partition_key: default_partition_key(),
            ensure_table_exists: true,
            max_request_length: default_max_request_length(),
        }
    }
}

/// The only storage backend herald ships.
pub const MEMORY_BACKEND: &str = "memory";

fn default_storage_backend() -> String {
    MEMORY_BACKEND.to_string()
}

fn default_table_name() -> String {
    herald_domain::repository::TEAM_DATA_TABLE.to_string()
}

fn default_partition_key() -> String {
    herald_domain::repository::TEAM_DATA_PARTITION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_request_length() -> usize {
    DEFAULT_MAX_REQUEST_LENGTH
}

impl StorageSettings {
    /// Repository binding for these settings.
    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig::new(&self.table_name, &self.partition_key)
    }

    /// Opens an in-memory store sized by these settings.
    pub fn open_memory_store(&self) -> StorageResult<Arc<MemoryKeyValueStore>> {
        if self.backend != MEMORY_BACKEND {
            return Err(StorageError::InvalidInput {
                message: format!("no store available for backend '{}'", self.backend),
            });
        }
        let store = MemoryKeyValueStore::new().with_max_request_length(self.max_request_length);
        if self.ensure_table_exists {
            store.ensure_table(&self.table_name)?;
        }
        Ok(Arc::new(store))
    }
}

/// Group-membership authorization settings.
///
/// # Example YAML Configuration
///
/// ```yaml
/// authorization:
///   group_id: "5f1c7a52-0c1e-4c55-9d7b-1e0a3b2f9c11"
///   scopes:
///     - GroupMember.Read.All
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuthorizationSettings {
    /// Directory group whose members may use the gated operations.
    /// Environment variable: `HERALD_AUTHORIZATION__GROUP_ID`
    pub group_id: Option<String>,

    /// Delegated permissions requested when reading memberships.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            group_id: None,
            scopes: default_scopes(),
        }
    }
}

fn default_scopes() -> Vec<String> {
    vec!["GroupMember.Read.All".to_string()]
}

impl AuthorizationSettings {
    /// Builds the requirement enforced by the gated handlers.
    pub fn requirement(&self) -> Result<AuthorizationRequirement, ConfigLoadError> {
        let group_id = self
            .group_id
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| ConfigLoadError::Invalid {
                message: "authorization.group_id is required".to_string(),
            })?;
        Ok(AuthorizationRequirement::new(
            self.scopes.iter().cloned(),
            group_id,
        ))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `HERALD_` and use `__` as separator.
    /// For example:
    /// - `HERALD_LOGGING__LEVEL=debug` overrides `logging.level`
    /// - `HERALD_STORAGE__PARTITION_KEY=...` overrides `storage.partition_key`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(
                Environment::with_prefix("HERALD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via HERALD_ prefixed env vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(
                Environment::with_prefix("HERALD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.storage.backend != MEMORY_BACKEND {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be \"{MEMORY_BACKEND}\", got: {}",
                    self.storage.backend
                ),
            });
        }

        if self.storage.max_request_length == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "storage.max_request_length must be greater than 0".to_string(),
            });
        }

        if let Err(e) = self.storage.repository_config().validate() {
            return Err(ConfigLoadError::Invalid {
                message: format!("storage: {e}"),
            });
        }

        if self
            .authorization
            .group_id
            .as_deref()
            .is_some_and(|g| g.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "authorization.group_id cannot be blank".to_string(),
            });
        }

        if self.authorization.scopes.is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "authorization.scopes must list at least one scope".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}
