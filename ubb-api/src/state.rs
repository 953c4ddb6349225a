//! App state: registry handle and config.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use ubb_core::error::{RegistryError, Result};
use ubb_core::types::EthAddress;
use ubb_core::AcademicRegistry;
use ubb_registry::{FileRegistry, MemoryRegistry};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Registry administrator
    pub owner: EthAddress,
    /// Snapshot file; `None` keeps the registry in memory only
    pub data_path: Option<PathBuf>,
    /// Writes between automatic snapshot saves (0 saves on every write)
    pub auto_save: u64,
}

impl ApiConfig {
    /// Creates an in-memory configuration for `owner`.
    pub fn new(owner: EthAddress) -> Self {
        Self {
            owner,
            data_path: None,
            auto_save: 0,
        }
    }

    /// Reads `UBB_OWNER_ADDRESS`, `UBB_DATA_PATH` and `UBB_AUTO_SAVE`,
    /// loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        let env = EnvSettings::load()?;
        let owner = env
            .owner
            .ok_or_else(|| RegistryError::ConfigError("UBB_OWNER_ADDRESS is not set".into()))?;

        Ok(Self {
            owner,
            data_path: env.data_path,
            auto_save: env.auto_save.unwrap_or(0),
        })
    }
}

/// Server settings found in the environment, each one optional.
///
/// Front ends that take their own flags layer them over these.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvSettings {
    /// `UBB_OWNER_ADDRESS`
    pub owner: Option<EthAddress>,
    /// `UBB_DATA_PATH`
    pub data_path: Option<PathBuf>,
    /// `UBB_AUTO_SAVE`
    pub auto_save: Option<u64>,
}

impl EnvSettings {
    /// Loads `.env` if present, then reads the `UBB_*` variables.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let owner = match std::env::var("UBB_OWNER_ADDRESS") {
            Ok(v) => Some(
                EthAddress::from_hex(&v)
                    .map_err(|e| RegistryError::ConfigError(format!("UBB_OWNER_ADDRESS: {e}")))?,
            ),
            Err(_) => None,
        };

        let auto_save = match std::env::var("UBB_AUTO_SAVE") {
            Ok(v) => Some(v.parse().map_err(|_| {
                RegistryError::ConfigError(format!("UBB_AUTO_SAVE: invalid value {v:?}"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            owner,
            data_path: std::env::var("UBB_DATA_PATH").ok().map(PathBuf::from),
            auto_save,
        })
    }
}

/// Shared state handed to every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Registry backend
    pub registry: Arc<dyn AcademicRegistry>,
    started_at: OnceLock<Instant>,
}

impl AppState {
    /// Creates state over a fresh in-memory registry.
    pub fn new(config: ApiConfig) -> Self {
        let registry = Arc::new(MemoryRegistry::new(config.owner));
        Self::with_registry(config, registry)
    }

    /// Creates state over an existing registry.
    pub fn with_registry(config: ApiConfig, registry: Arc<dyn AcademicRegistry>) -> Self {
        Self {
            config,
            registry,
            started_at: OnceLock::new(),
        }
    }

    /// Records when the server started serving; later calls are ignored.
    pub fn mark_started(&self, at: Instant) {
        let _ = self.started_at.set(at);
    }

    /// Seconds since the server started, or 0 before it has.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at
            .get()
            .map(|start| start.elapsed().as_secs())
            .unwrap_or(0)
    }

    /// Creates state from config, opening the snapshot file when one is set.
    pub async fn from_config(config: ApiConfig) -> Result<Self> {
        let Some(path) = config.data_path.clone() else {
            return Ok(Self::new(config));
        };

        let registry = FileRegistry::with_auto_save(&path, config.owner, config.auto_save).await?;
        Ok(Self::with_registry(config, Arc::new(registry)))
    }
}
