use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored prompt entry.
///
/// Every field defaults when absent so that hand-edited or imported data
/// with missing keys still loads; lengths are only enforced by
/// [`crate::validate`] at form-submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptRecord {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub tags: Vec<String>,
    pub prompt: String,
}

impl PromptRecord {
    pub fn from_draft(id: i64, draft: PromptDraft) -> Self {
        Self {
            id,
            name: draft.name,
            comment: draft.comment,
            tags: draft.tags,
            prompt: draft.prompt,
        }
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    /// Build a record from stored or imported JSON without rejecting it.
    ///
    /// Any field that is absent, null or of the wrong type takes its default.
    /// Numeric strings and floats are accepted as ids. Returns `None` only
    /// when `value` is not an object.
    pub fn from_json_lenient(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            id: fields.get("id").map(lenient_id).unwrap_or_default(),
            name: lenient_text(fields.get("name")),
            comment: lenient_text(fields.get("comment")),
            tags: lenient_tags(fields.get("tags")),
            prompt: lenient_text(fields.get("prompt")),
        })
    }
}

fn lenient_id(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Strings as-is, numbers and booleans in their JSON spelling, anything else `None`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text(value: Option<&Value>) -> String {
    value.and_then(scalar_text).unwrap_or_default()
}

fn lenient_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(tag)) if !tag.is_empty() => vec![tag.clone()],
        _ => Vec::new(),
    }
}

/// Normalized, validated field values without an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDraft {
    pub name: String,
    pub comment: String,
    pub tags: Vec<String>,
    pub prompt: String,
}

/// Raw form input as typed by the user. `tags` is the comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    pub name: String,
    pub comment: String,
    pub tags: String,
    pub prompt: String,
}

impl PromptForm {
    pub fn new(
        name: impl Into<String>,
        comment: impl Into<String>,
        tags: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            tags: tags.into(),
            prompt: prompt.into(),
        }
    }

    /// Populate the form from an existing record, for editing.
    pub fn from_record(record: &PromptRecord) -> Self {
        Self {
            name: record.name.clone(),
            comment: record.comment.clone(),
            tags: record.tags.join(", "),
            prompt: record.prompt.clone(),
        }
    }
}

/// Issues record ids from wall-clock milliseconds.
///
/// Ids never repeat within a session: if the clock has not advanced past
/// the last issued id, the next id is `last + 1`. Once `last` reaches
/// `i64::MAX` the clock keeps returning it; callers holding the record list
/// must check for a collision.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    /// A clock that will never issue an id already present in `records`.
    pub fn starting_after(records: &[PromptRecord]) -> Self {
        Self {
            last: records.iter().map(|r| r.id).max().unwrap_or(0),
        }
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_from(Utc::now().timestamp_millis())
    }

    fn next_from(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
