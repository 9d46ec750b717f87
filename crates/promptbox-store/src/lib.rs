mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A durable string-keyed store. Each key holds one opaque value that is
/// replaced wholesale on every write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Write (create or overwrite) a value.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read a value. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Read a value, returning `None` if it does not exist.
    async fn get_opt(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.get(key).await {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// -- Keys --

/// JSON array of every prompt record.
pub const RECORDS_KEY: &str = "prompts_data";
/// `grid` or `list`.
pub const LAYOUT_KEY: &str = "display_mode";
/// `true` or `false`.
pub const AUTO_SAVE_KEY: &str = "auto_save_enabled";

// -- Configuration --

/// Configuration for the on-disk store.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Base directory holding one file per key. When `None`, the XDG data
    /// directory is used.
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Build from `PROMPTBOX_DATA_DIR`, falling back to the default directory.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os("PROMPTBOX_DATA_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }

    /// The directory the store will actually use.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// `$XDG_DATA_HOME/promptbox`, else `$HOME/.local/share/promptbox`.
pub fn default_data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("promptbox")
}

// -- Factory --

/// Create the on-disk store described by `config`.
pub fn create_store(config: &StoreConfig) -> Arc<dyn KeyValueStore> {
    let store = LocalStore::new(config);
    tracing::debug!("using data dir {}", store.base_dir().display());
    Arc::new(store)
}
