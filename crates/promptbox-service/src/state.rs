use std::collections::HashSet;

use promptbox_core::{filter_records, IdClock, PromptDraft, PromptRecord, Settings};

/// Everything the session knows: the ordered records plus UI-independent
/// editing, confirmation, search and settings state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    records: Vec<PromptRecord>,
    clock: IdClock,
    pub editing_id: Option<i64>,
    pub pending_delete: Option<i64>,
    pub query: String,
    pub settings: Settings,
}

impl AppState {
    pub fn new(records: Vec<PromptRecord>, settings: Settings) -> Self {
        Self {
            clock: IdClock::starting_after(&records),
            records,
            settings,
            ..Default::default()
        }
    }

    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    /// Records matching the current query, in store order.
    pub fn visible(&self) -> Vec<&PromptRecord> {
        filter_records(&self.records, &self.query)
    }

    /// First record with `id`.
    pub fn get(&self, id: i64) -> Option<&PromptRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append a new record and return its id.
    pub fn create(&mut self, draft: PromptDraft) -> i64 {
        let mut id = self.clock.next_id();
        if self.get(id).is_some() {
            // Only reachable once the clock is pinned at i64::MAX
            id = self.smallest_free_id();
        }
        self.records.push(PromptRecord::from_draft(id, draft));
        id
    }

    fn smallest_free_id(&self) -> i64 {
        let taken: HashSet<i64> = self.records.iter().map(|r| r.id).collect();
        (1..).find(|id| !taken.contains(id)).unwrap_or_default()
    }

    /// Replace the first record with `id`, keeping its position.
    /// Returns false (and changes nothing) when no record matches.
    pub fn update(&mut self, id: i64, draft: PromptDraft) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = PromptRecord::from_draft(id, draft);
                true
            }
            None => false,
        }
    }

    /// Remove every record with `id`. Returns how many were removed.
    pub fn remove(&mut self, id: i64) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.editing_id == Some(id) {
            self.editing_id = None;
        }
        before - self.records.len()
    }

    /// Replace the whole record list, as an import does.
    pub fn replace_all(&mut self, records: Vec<PromptRecord>) {
        self.clock = IdClock::starting_after(&records);
        self.records = records;
        self.editing_id = None;
        self.pending_delete = None;
    }
}
