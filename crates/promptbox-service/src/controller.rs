use std::path::PathBuf;
use std::sync::Arc;

use promptbox_core::{validate, LayoutMode, PromptForm, PromptRecord};
use promptbox_store::KeyValueStore;
use tracing::{debug, error, info, warn};

use crate::{AppState, BlockingBackend, Clipboard, Notification, ServiceError};

/// A user intent, independent of how it was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a record, or replace the one being edited.
    Submit(PromptForm),
    BeginEdit(i64),
    CancelEdit,
    /// Ask to delete; nothing is removed until `ConfirmDelete(true)`.
    RequestDelete(i64),
    ConfirmDelete(bool),
    Copy(i64),
    /// Export to a directory (as `prompts_data.json`) or to a file path.
    Export(PathBuf),
    Import(PathBuf),
    Filter(String),
    /// Search for exactly this tag.
    SelectTag(String),
    SetLayout(LayoutMode),
    SetAutoSave(bool),
}

/// What the presentation layer should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; re-render.
    Changed,
    /// Blocking message. After a `Submit`, the form stays as typed.
    Alert(String),
    /// Transient message.
    Notice(Notification),
    /// Fill the form with these values; the next `Submit` updates.
    Edit(PromptForm),
    /// Ask the user yes/no before deleting this record.
    ConfirmDelete(PromptRecord),
    Noop,
}

pub const DELETE_PROMPT: &str = "Really delete this prompt?";
pub const IMPORT_DONE: &str = "Data imported";

/// Owns the session state and routes every command to its handler.
pub struct Controller {
    state: AppState,
    backend: BlockingBackend,
    clipboard: Box<dyn Clipboard>,
}

impl Controller {
    /// Load records and settings from `store`.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        clipboard: Box<dyn Clipboard>,
    ) -> Result<Self, ServiceError> {
        let backend = BlockingBackend::new(store)?;
        let records = backend.load_records()?;
        let settings = backend.load_settings()?;
        info!(
            "opened {} records (layout={}, auto_save={})",
            records.len(),
            settings.layout.as_str(),
            settings.auto_save
        );
        Ok(Self {
            state: AppState::new(records, settings),
            backend,
            clipboard,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Records matching the current query.
    pub fn visible(&self) -> Vec<&PromptRecord> {
        self.state.visible()
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        debug!("dispatch {command:?}");
        match command {
            Command::Submit(form) => self.submit(&form),
            Command::BeginEdit(id) => self.begin_edit(id),
            Command::CancelEdit => self.cancel_edit(),
            Command::RequestDelete(id) => self.request_delete(id),
            Command::ConfirmDelete(confirmed) => self.confirm_delete(confirmed),
            Command::Copy(id) => self.copy(id),
            Command::Export(target) => self.export(target),
            Command::Import(path) => self.import(path),
            Command::Filter(query) => self.set_query(query),
            Command::SelectTag(tag) => self.set_query(tag),
            Command::SetLayout(layout) => self.set_layout(layout),
            Command::SetAutoSave(enabled) => self.set_auto_save(enabled),
        }
    }

    // -- Handlers --

    fn submit(&mut self, form: &PromptForm) -> Outcome {
        let draft = match validate(form) {
            Ok(draft) => draft,
            Err(e) => {
                debug!(field = e.field(), "submission rejected: {e}");
                return Outcome::Alert(e.to_string());
            }
        };

        match self.state.editing_id.take() {
            Some(id) => {
                if !self.state.update(id, draft) {
                    warn!("record {id} vanished while being edited");
                }
            }
            None => {
                let id = self.state.create(draft);
                debug!("created record {id}");
            }
        }

        if self.state.settings.auto_save {
            self.save_records()
        } else {
            Outcome::Changed
        }
    }

    fn begin_edit(&mut self, id: i64) -> Outcome {
        match self.state.get(id) {
            Some(record) => {
                let form = PromptForm::from_record(record);
                self.state.editing_id = Some(id);
                Outcome::Edit(form)
            }
            None => Outcome::Noop,
        }
    }

    fn cancel_edit(&mut self) -> Outcome {
        self.state.editing_id = None;
        Outcome::Changed
    }

    fn request_delete(&mut self, id: i64) -> Outcome {
        match self.state.get(id) {
            Some(record) => {
                let record = record.clone();
                self.state.pending_delete = Some(id);
                Outcome::ConfirmDelete(record)
            }
            None => Outcome::Noop,
        }
    }

    fn confirm_delete(&mut self, confirmed: bool) -> Outcome {
        let Some(id) = self.state.pending_delete.take() else {
            return Outcome::Noop;
        };
        if !confirmed {
            return Outcome::Noop;
        }
        let removed = self.state.remove(id);
        info!("deleted {removed} record(s) with id {id}");
        self.save_records()
    }

    fn copy(&mut self, id: i64) -> Outcome {
        let Some(record) = self.state.get(id) else {
            return Outcome::Noop;
        };
        match self.clipboard.set_text(&record.prompt) {
            Ok(()) => Outcome::Notice(Notification::info("Prompt copied")),
            Err(e) => {
                warn!("copy failed: {e}");
                Outcome::Notice(Notification::error("Copy failed"))
            }
        }
    }

    fn export(&mut self, target: PathBuf) -> Outcome {
        match self.backend.export_to(&target, self.state.records()) {
            Ok(path) => Outcome::Notice(Notification::info(format!(
                "Exported to {}",
                path.display()
            ))),
            Err(e) => {
                error!("export to {} failed: {e}", target.display());
                Outcome::Alert(format!("Export failed: {e}"))
            }
        }
    }

    fn import(&mut self, path: PathBuf) -> Outcome {
        let records = match self.backend.import_from(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!("import from {} rejected: {e:?}", path.display());
                return Outcome::Alert(e.to_string());
            }
        };
        info!("imported {} records from {}", records.len(), path.display());
        self.state.replace_all(records);
        match self.backend.save_records(self.state.records()) {
            Ok(()) => Outcome::Alert(IMPORT_DONE.into()),
            Err(e) => {
                error!("saving imported records failed: {e}");
                Outcome::Alert(format!("{IMPORT_DONE}, but saving failed: {e}"))
            }
        }
    }

    fn set_query(&mut self, query: String) -> Outcome {
        self.state.query = query;
        Outcome::Changed
    }

    fn set_layout(&mut self, layout: LayoutMode) -> Outcome {
        self.state.settings.layout = layout;
        match self.backend.save_layout(layout) {
            Ok(()) => Outcome::Changed,
            Err(e) => {
                error!("saving layout failed: {e}");
                Outcome::Notice(Notification::error(format!("Save failed: {e}")))
            }
        }
    }

    fn set_auto_save(&mut self, enabled: bool) -> Outcome {
        self.state.settings.auto_save = enabled;
        info!("auto-save {}", if enabled { "enabled" } else { "disabled" });
        match self.backend.save_auto_save(enabled) {
            Ok(()) => Outcome::Changed,
            Err(e) => {
                error!("saving auto-save setting failed: {e}");
                Outcome::Notice(Notification::error(format!("Save failed: {e}")))
            }
        }
    }

    fn save_records(&self) -> Outcome {
        match self.backend.save_records(self.state.records()) {
            Ok(()) => Outcome::Changed,
            Err(e) => {
                error!("saving records failed: {e}");
                Outcome::Notice(Notification::error(format!("Save failed: {e}")))
            }
        }
    }
}
