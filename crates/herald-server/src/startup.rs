//! Service startup.
//!
//! Turns a [`ServerConfig`] into a running team data service: logging is
//! installed, the configured store is opened and the gated handler is wired
//! to the identity collaborators supplied by the host.
//!
//! ```ignore
//! let config = herald_server::startup::load_config(Some(Path::new("herald.yaml")))?;
//! let service = herald_server::startup::start(config, token_provider, directory)?;
//! let teams = service.handler.list_teams(&caller).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use herald_domain::{DirectoryClient, TokenProvider};
use herald_storage::{MemoryKeyValueStore, StorageError};
use tracing::info;

use crate::config::{ConfigLoadError, ServerConfig};
use crate::handlers::TeamDataHandler;
use crate::observability::logging::{init_logging, LoggingConfig};

/// Errors raised while bringing the service up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error("failed to open storage: {0}")]
    Storage(#[from] StorageError),
}

/// A started service.
pub struct HeraldService<T, D> {
    pub config: ServerConfig,
    pub store: Arc<MemoryKeyValueStore>,
    pub handler: TeamDataHandler<MemoryKeyValueStore, T, D>,
}

/// Loads the config file at `path`, or the environment alone when no path
/// is given.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigLoadError> {
    match path {
        Some(path) => ServerConfig::load(path),
        None => ServerConfig::from_env(),
    }
}

/// Starts the service described by `config`.
pub fn start<T, D>(
    config: ServerConfig,
    token_provider: Arc<T>,
    directory: Arc<D>,
) -> Result<HeraldService<T, D>, StartupError>
where
    T: TokenProvider,
    D: DirectoryClient,
{
    config.validate()?;

    let logging = LoggingConfig::from_settings(&config.logging);
    if !init_logging(&logging) {
        info!("global subscriber already installed, keeping it");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting herald");

    let store = config.storage.open_memory_store()?;
    info!(
        backend = %config.storage.backend,
        table = %config.storage.table_name,
        partition = %config.storage.partition_key,
        "team data store ready"
    );

    let handler = TeamDataHandler::from_config(&config, Arc::clone(&store), token_provider, directory)?;

    Ok(HeraldService {
        config,
        store,
        handler,
    })
}
