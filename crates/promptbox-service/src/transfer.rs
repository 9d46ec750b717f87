//! JSON export and import of the whole record list.

use std::path::{Path, PathBuf};

use promptbox_core::PromptRecord;
use serde_json::Value;
use tracing::{info, warn};

use crate::{ImportError, ServiceError};

pub const EXPORT_FILE_NAME: &str = "prompts_data.json";

/// Pretty-printed JSON array, two-space indent.
pub fn export_json(records: &[PromptRecord]) -> Result<String, ServiceError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse an import file's contents.
///
/// Malformed JSON is a read failure; well-formed JSON that is not an array
/// of objects is an invalid format. Records are taken as-is: missing, null
/// or mistyped fields default and no length or id checks are made.
pub fn parse_import(text: &str) -> Result<Vec<PromptRecord>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Read(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ImportError::InvalidFormat);
    };
    items
        .iter()
        .map(PromptRecord::from_json_lenient)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            warn!("import array has entries that are not objects");
            ImportError::InvalidFormat
        })
}

/// Where an export to `target` lands: directories get `prompts_data.json`
/// appended, anything else is used as the file path.
pub fn export_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(EXPORT_FILE_NAME)
    } else {
        target.to_path_buf()
    }
}

pub async fn write_export(target: &Path, records: &[PromptRecord]) -> Result<PathBuf, ServiceError> {
    let path = export_path(target);
    let json = export_json(records)?;
    tokio::fs::write(&path, json).await?;
    info!("exported {} records to {}", records.len(), path.display());
    Ok(path)
}

pub async fn read_import(path: &Path) -> Result<Vec<PromptRecord>, ImportError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportError::Read(format!("{}: {e}", path.display())))?;
    parse_import(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PromptRecord> {
        vec![
            PromptRecord {
                id: 1700000000000,
                name: "Greeting".into(),
                comment: String::new(),
                tags: vec!["a".into(), "bb".into()],
                prompt: "Hello".into(),
            },
            PromptRecord {
                id: 1700000000001,
                name: "Summary".into(),
                comment: "short".into(),
                tags: vec![],
                prompt: "Summarize:\n{{text}}".into(),
            },
        ]
    }

    #[test]
    fn export_is_pretty_printed() {
        let json = export_json(&sample()[..1]).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": 1700000000000,"));
    }

    #[test]
    fn export_then_import_reproduces_records() {
        let records = sample();
        let json = export_json(&records).unwrap();
        assert_eq!(parse_import(&json).unwrap(), records);
    }

    #[test]
    fn non_array_is_invalid_format() {
        assert!(matches!(
            parse_import(r#"{"a":1}"#),
            Err(ImportError::InvalidFormat)
        ));
        assert!(matches!(parse_import("42"), Err(ImportError::InvalidFormat)));
    }

    #[test]
    fn malformed_json_is_read_failure() {
        let err = parse_import("[{").unwrap_err();
        assert!(matches!(err, ImportError::Read(_)));
        assert_eq!(err.to_string(), "Failed to read file");
    }

    #[test]
    fn array_of_non_objects_is_invalid_format() {
        assert!(matches!(
            parse_import("[1, 2]"),
            Err(ImportError::InvalidFormat)
        ));
    }

    #[test]
    fn import_is_lenient_about_record_contents() {
        let long = "x".repeat(500);
        let text = format!(r#"[{{"id":5,"prompt":"{long}"}},{{"id":5,"name":"dup"}},{{}}]"#);
        let records = parse_import(&text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].prompt.len(), 500);
        assert_eq!(records[1].id, 5);
        assert_eq!(records[2], PromptRecord::default());
    }

    #[test]
    fn mistyped_fields_are_accepted() {
        let records =
            parse_import(r#"[{"id":"1700000000000","name":"x","tags":["a"],"prompt":"p"}]"#)
                .unwrap();
        assert_eq!(records[0].id, 1700000000000);
        assert_eq!(records[0].name, "x");

        let records = parse_import(r#"[{"id":1,"name":"y","tags":null}]"#).unwrap();
        assert_eq!(records[0].name, "y");
        assert!(records[0].tags.is_empty());

        let records = parse_import(r#"[{"id":1.5,"name":"z"},{"tags":null}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1], PromptRecord::default());
    }

    #[test]
    fn empty_array_imports_nothing() {
        assert!(parse_import("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_into_directory_uses_default_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_export(tmp.path(), &sample()).await.unwrap();
        assert_eq!(path, tmp.path().join(EXPORT_FILE_NAME));

        let records = read_import(&path).await.unwrap();
        assert_eq!(records, sample());
    }

    #[tokio::test]
    async fn export_to_explicit_file() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("backup.json");
        let path = write_export(&target, &sample()).await.unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[tokio::test]
    async fn missing_import_file_is_read_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_import(&tmp.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, ImportError::Read(_)));
    }
}
