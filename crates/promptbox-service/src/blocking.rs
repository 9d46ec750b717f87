use std::path::{Path, PathBuf};
use std::sync::Arc;

use promptbox_core::{LayoutMode, PromptRecord, Settings};
use promptbox_store::KeyValueStore;
use tokio::runtime::Runtime;

use crate::{transfer, ImportError, Persistence, ServiceError};

/// Blocking wrapper around the async `Persistence` and file transfer.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the controller and the TUI.
pub struct BlockingBackend {
    inner: Persistence,
    rt: Runtime,
}

impl BlockingBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            inner: Persistence::new(store),
            rt: Runtime::new()?,
        })
    }

    pub fn load_records(&self) -> Result<Vec<PromptRecord>, ServiceError> {
        self.rt.block_on(self.inner.load_records())
    }

    pub fn save_records(&self, records: &[PromptRecord]) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.save_records(records))
    }

    pub fn load_settings(&self) -> Result<Settings, ServiceError> {
        self.rt.block_on(self.inner.load_settings())
    }

    pub fn save_layout(&self, layout: LayoutMode) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.save_layout(layout))
    }

    pub fn save_auto_save(&self, enabled: bool) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.save_auto_save(enabled))
    }

    // -- File transfer --

    pub fn export_to(&self, target: &Path, records: &[PromptRecord]) -> Result<PathBuf, ServiceError> {
        self.rt.block_on(transfer::write_export(target, records))
    }

    pub fn import_from(&self, path: &Path) -> Result<Vec<PromptRecord>, ImportError> {
        self.rt.block_on(transfer::read_import(path))
    }
}
