//! Command dispatch tests.
//!
//! Each test opens a `Controller` over an in-memory store and clipboard,
//! dispatches commands, and checks both the in-memory state and what a
//! fresh controller over the same store would load.

use std::sync::Arc;

use promptbox_core::{LayoutMode, PromptForm};
use promptbox_service::{Command, Controller, MemoryClipboard, NoticeLevel, Outcome};
use promptbox_store::{KeyValueStore, MemoryStore};

fn open(store: &Arc<MemoryStore>) -> Controller {
    open_with(store, MemoryClipboard::new())
}

fn open_with(store: &Arc<MemoryStore>, clipboard: MemoryClipboard) -> Controller {
    let store: Arc<dyn KeyValueStore> = store.clone();
    Controller::open(store, Box::new(clipboard)).unwrap()
}

fn form(name: &str, tags: &str, prompt: &str) -> PromptForm {
    PromptForm::new(name, "", tags, prompt)
}

fn add(ctl: &mut Controller, name: &str, tags: &str) -> i64 {
    let outcome = ctl.dispatch(Command::Submit(form(name, tags, "body")));
    assert_eq!(outcome, Outcome::Changed);
    ctl.state().records().last().unwrap().id
}

fn names(ctl: &Controller) -> Vec<String> {
    ctl.state().records().iter().map(|r| r.name.clone()).collect()
}

// ---- Create ----

#[test]
fn submit_creates_and_persists() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    let outcome = ctl.dispatch(Command::Submit(form("Greeting", "a,bb,ccc", "Hello")));
    assert_eq!(outcome, Outcome::Changed);

    let records = ctl.state().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tags, vec!["a", "bb", "ccc"]);
    assert_eq!(records[0].comment, "");

    let reopened = open(&store);
    assert_eq!(reopened.state().records(), ctl.state().records());
}

#[test]
fn empty_tag_tokens_are_dropped_on_submit() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "n", "x,,yy");
    assert_eq!(ctl.state().records()[0].tags, vec!["x", "yy"]);
}

#[test]
fn invalid_submission_alerts_and_leaves_store_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "keep", "");

    let outcome = ctl.dispatch(Command::Submit(form("n", "toolongtagname", "p")));
    assert!(matches!(outcome, Outcome::Alert(ref msg) if msg.contains("tag")));

    let outcome = ctl.dispatch(Command::Submit(form(&"n".repeat(21), "", "p")));
    assert_eq!(
        outcome,
        Outcome::Alert("name must be 1-20 characters".into())
    );

    assert_eq!(names(&ctl), vec!["keep"]);
    assert_eq!(open(&store).state().records().len(), 1);
}

#[test]
fn ids_are_unique_across_rapid_submissions() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    for i in 0..20 {
        add(&mut ctl, &format!("p{i}"), "");
    }
    let mut ids: Vec<i64> = ctl.state().records().iter().map(|r| r.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

// ---- Edit ----

#[test]
fn edit_replaces_in_place() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "a", "");
    let b = add(&mut ctl, "b", "t1, t2");
    add(&mut ctl, "c", "");

    let mut edited = match ctl.dispatch(Command::BeginEdit(b)) {
        Outcome::Edit(form) => form,
        other => panic!("expected edit outcome, got {other:?}"),
    };
    assert_eq!(edited.tags, "t1, t2");
    assert_eq!(ctl.state().editing_id, Some(b));

    edited.name = "B".into();
    assert_eq!(ctl.dispatch(Command::Submit(edited)), Outcome::Changed);
    assert_eq!(names(&ctl), vec!["a", "B", "c"]);
    assert_eq!(ctl.state().get(b).unwrap().name, "B");
    assert_eq!(ctl.state().editing_id, None);
}

#[test]
fn failed_edit_keeps_editing_id() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    let id = add(&mut ctl, "a", "");
    ctl.dispatch(Command::BeginEdit(id));
    let outcome = ctl.dispatch(Command::Submit(form("", "", "p")));
    assert!(matches!(outcome, Outcome::Alert(_)));
    assert_eq!(ctl.state().editing_id, Some(id));
}

#[test]
fn cancel_edit_returns_to_create() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    let id = add(&mut ctl, "a", "");
    ctl.dispatch(Command::BeginEdit(id));
    ctl.dispatch(Command::CancelEdit);
    add(&mut ctl, "b", "");
    assert_eq!(names(&ctl), vec!["a", "b"]);
}

#[test]
fn begin_edit_unknown_id_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    assert_eq!(ctl.dispatch(Command::BeginEdit(123)), Outcome::Noop);
    assert_eq!(ctl.state().editing_id, None);
}

// ---- Delete ----

#[test]
fn delete_requires_confirmation() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    let id = add(&mut ctl, "a", "");

    let outcome = ctl.dispatch(Command::RequestDelete(id));
    assert!(matches!(outcome, Outcome::ConfirmDelete(ref r) if r.id == id));
    assert_eq!(ctl.state().records().len(), 1);

    assert_eq!(ctl.dispatch(Command::ConfirmDelete(false)), Outcome::Noop);
    assert_eq!(ctl.state().records().len(), 1);
    assert_eq!(ctl.state().pending_delete, None);

    ctl.dispatch(Command::RequestDelete(id));
    assert_eq!(ctl.dispatch(Command::ConfirmDelete(true)), Outcome::Changed);
    assert!(ctl.state().records().is_empty());
    assert!(open(&store).state().records().is_empty());
}

#[test]
fn confirm_without_request_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "a", "");
    assert_eq!(ctl.dispatch(Command::ConfirmDelete(true)), Outcome::Noop);
    assert_eq!(ctl.state().records().len(), 1);
}

// ---- Auto-save ----

#[test]
fn disabled_auto_save_keeps_changes_session_only() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "saved", "");

    ctl.dispatch(Command::SetAutoSave(false));
    add(&mut ctl, "unsaved", "");
    assert_eq!(names(&ctl), vec!["saved", "unsaved"]);

    let reopened = open(&store);
    assert_eq!(names(&reopened), vec!["saved"]);
    assert!(!reopened.state().settings.auto_save);
}

#[test]
fn delete_persists_even_with_auto_save_disabled() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    let first = add(&mut ctl, "first", "");
    ctl.dispatch(Command::SetAutoSave(false));
    add(&mut ctl, "second", "");

    ctl.dispatch(Command::RequestDelete(first));
    ctl.dispatch(Command::ConfirmDelete(true));

    // The forced save writes the whole session, including the unsaved record.
    assert_eq!(names(&open(&store)), vec!["second"]);
}

// ---- Search ----

#[test]
fn filter_and_tag_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "Foo", "mail");
    add(&mut ctl, "bar", "code,Mailer");
    add(&mut ctl, "baz", "");

    ctl.dispatch(Command::Filter("foo".into()));
    let visible: Vec<&str> = ctl.visible().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(visible, vec!["Foo"]);

    ctl.dispatch(Command::SelectTag("mail".into()));
    assert_eq!(ctl.state().query, "mail");
    let visible: Vec<&str> = ctl.visible().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(visible, vec!["Foo", "bar"]);

    ctl.dispatch(Command::Filter(String::new()));
    assert_eq!(ctl.visible().len(), 3);
}

// ---- Copy ----

#[test]
fn copy_writes_prompt_to_clipboard() {
    let store = Arc::new(MemoryStore::new());
    let clip = MemoryClipboard::new();
    let mut ctl = open_with(&store, clip.clone());
    ctl.dispatch(Command::Submit(form("n", "", "the payload")));
    let id = ctl.state().records()[0].id;

    let Outcome::Notice(notice) = ctl.dispatch(Command::Copy(id)) else {
        panic!("expected notice");
    };
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "Prompt copied");
    assert_eq!(clip.contents().as_deref(), Some("the payload"));
}

#[test]
fn copy_failure_is_reported_longer() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open_with(&store, MemoryClipboard::failing());
    let id = add(&mut ctl, "n", "");

    let Outcome::Notice(notice) = ctl.dispatch(Command::Copy(id)) else {
        panic!("expected notice");
    };
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.duration.as_millis(), 4000);
}

#[test]
fn copy_unknown_id_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    assert_eq!(ctl.dispatch(Command::Copy(1)), Outcome::Noop);
}

// ---- Layout ----

#[test]
fn layout_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    assert_eq!(ctl.state().settings.layout, LayoutMode::Grid);
    ctl.dispatch(Command::SetLayout(LayoutMode::List));
    assert_eq!(open(&store).state().settings.layout, LayoutMode::List);
}

// ---- Export / import ----

#[test]
fn export_then_import_roundtrips() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "one", "a");
    add(&mut ctl, "two", "b,c");
    let before = ctl.state().records().to_vec();

    let outcome = ctl.dispatch(Command::Export(tmp.path().to_path_buf()));
    assert!(matches!(outcome, Outcome::Notice(_)));
    let file = tmp.path().join("prompts_data.json");
    assert!(file.exists());

    let other = Arc::new(MemoryStore::new());
    let mut fresh = open(&other);
    add(&mut fresh, "to be replaced", "");
    assert_eq!(
        fresh.dispatch(Command::Import(file)),
        Outcome::Alert("Data imported".into())
    );
    assert_eq!(fresh.state().records(), before.as_slice());
    assert_eq!(open(&other).state().records(), before.as_slice());
}

#[test]
fn import_non_array_leaves_store_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bad.json");
    std::fs::write(&path, r#"{"a":1}"#).unwrap();

    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "keep", "");

    assert_eq!(
        ctl.dispatch(Command::Import(path)),
        Outcome::Alert("Invalid file format".into())
    );
    assert_eq!(names(&ctl), vec!["keep"]);
}

#[test]
fn import_malformed_json_reports_read_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("broken.json");
    std::fs::write(&path, "[{\"id\": ").unwrap();

    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    add(&mut ctl, "keep", "");

    assert_eq!(
        ctl.dispatch(Command::Import(path)),
        Outcome::Alert("Failed to read file".into())
    );
    assert_eq!(names(&ctl), vec!["keep"]);
}

#[test]
fn import_accepts_unvalidated_records() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("lenient.json");
    let long = "x".repeat(60);
    std::fs::write(
        &path,
        format!(r#"[{{"id":1,"name":"{long}"}},{{"id":1,"name":"dup"}}]"#),
    )
    .unwrap();

    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    ctl.dispatch(Command::Import(path));
    assert_eq!(ctl.state().records().len(), 2);
    assert!(ctl.state().records()[1].tags.is_empty());

    // New records never reuse an imported id.
    let id = add(&mut ctl, "new", "");
    assert!(id > 1);
}

#[test]
fn import_accepts_mistyped_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("typed.json");
    std::fs::write(
        &path,
        r#"[{"id":"1700000000000","name":"a","prompt":"p"},{"id":2,"name":"b","tags":null}]"#,
    )
    .unwrap();

    let store = Arc::new(MemoryStore::new());
    let mut ctl = open(&store);
    assert_eq!(
        ctl.dispatch(Command::Import(path)),
        Outcome::Alert("Data imported".into())
    );
    assert_eq!(names(&ctl), vec!["a", "b"]);
    assert_eq!(ctl.state().records()[0].id, 1700000000000);
}

#[test]
fn stored_mistyped_record_survives_reopen_and_save() {
    let store = Arc::new(MemoryStore::new());
    {
        let raw: Arc<dyn KeyValueStore> = store.clone();
        let json = r#"[{"id":1,"name":"keep1","tags":["a"],"prompt":"p"},{"id":2,"name":"keep2","comment":null,"prompt":"p"}]"#;
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(raw.put(promptbox_store::RECORDS_KEY, json.into()))
            .unwrap();
    }

    let mut ctl = open(&store);
    assert_eq!(names(&ctl), vec!["keep1", "keep2"]);
    add(&mut ctl, "new", "");

    let reopened = open(&store);
    assert_eq!(names(&reopened), vec!["keep1", "keep2", "new"]);
}
