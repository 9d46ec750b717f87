use std::sync::Arc;

use bytes::Bytes;
use promptbox_core::{LayoutMode, PromptRecord, Settings};
use promptbox_store::{KeyValueStore, AUTO_SAVE_KEY, LAYOUT_KEY, RECORDS_KEY};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ServiceError;

/// Reads and writes the record snapshot and the two settings.
///
/// Every record write is a full snapshot that replaces the previous value.
/// Loaded records are not validated.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the stored records. A missing key yields an empty list; so does
    /// a value that is not a JSON array, which is logged and left in place
    /// until the next save. Inside an array, mistyped fields take their
    /// defaults and only non-object entries are dropped.
    pub async fn load_records(&self) -> Result<Vec<PromptRecord>, ServiceError> {
        let Some(data) = self.store.get_opt(RECORDS_KEY).await? else {
            debug!("no stored records, starting empty");
            return Ok(Vec::new());
        };
        let items = match serde_json::from_slice::<Value>(&data) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!("stored records are not a JSON array, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("stored records are unreadable, starting empty: {e}");
                return Ok(Vec::new());
            }
        };
        let records: Vec<PromptRecord> = items
            .iter()
            .filter_map(PromptRecord::from_json_lenient)
            .collect();
        if records.len() < items.len() {
            warn!(
                "skipped {} stored entries that are not objects",
                items.len() - records.len()
            );
        }
        debug!("loaded {} records", records.len());
        Ok(records)
    }

    pub async fn save_records(&self, records: &[PromptRecord]) -> Result<(), ServiceError> {
        let json = serde_json::to_vec(records)?;
        self.store.put(RECORDS_KEY, Bytes::from(json)).await?;
        debug!("saved {} records", records.len());
        Ok(())
    }

    /// Load layout and auto-save. Unknown layout strings fall back to grid;
    /// auto-save is on unless the stored value is exactly `false`.
    pub async fn load_settings(&self) -> Result<Settings, ServiceError> {
        let mut settings = Settings::default();

        if let Some(data) = self.store.get_opt(LAYOUT_KEY).await? {
            match std::str::from_utf8(&data).ok().and_then(LayoutMode::from_str) {
                Some(layout) => settings.layout = layout,
                None => warn!("ignoring unknown stored layout"),
            }
        }

        if let Some(data) = self.store.get_opt(AUTO_SAVE_KEY).await? {
            settings.auto_save = data.as_ref() != b"false";
        }

        Ok(settings)
    }

    pub async fn save_layout(&self, layout: LayoutMode) -> Result<(), ServiceError> {
        self.store
            .put(LAYOUT_KEY, Bytes::from_static(layout.as_str().as_bytes()))
            .await?;
        Ok(())
    }

    pub async fn save_auto_save(&self, enabled: bool) -> Result<(), ServiceError> {
        let value: &'static str = if enabled { "true" } else { "false" };
        self.store
            .put(AUTO_SAVE_KEY, Bytes::from_static(value.as_bytes()))
            .await?;
        Ok(())
    }
}
