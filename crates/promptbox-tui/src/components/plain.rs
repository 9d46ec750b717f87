//! Plain-text rendering for non-interactive output.

use std::fmt::Write;

use promptbox_core::{LayoutMode, PromptRecord};

pub fn render(records: &[&PromptRecord], layout: LayoutMode) -> String {
    match layout {
        LayoutMode::Grid => render_cards(records),
        LayoutMode::List => render_table(records),
    }
}

fn render_cards(records: &[&PromptRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "# {}  [{}]", record.name, record.id);
        if record.has_comment() {
            let _ = writeln!(out, "  Comment: {}", record.comment);
        }
        if !record.tags.is_empty() {
            let chips: Vec<String> = record.tags.iter().map(|t| format!("#{t}")).collect();
            let _ = writeln!(out, "  {}", chips.join(" "));
        }
        for line in record.prompt.lines() {
            let _ = writeln!(out, "  | {line}");
        }
        out.push('\n');
    }
    out
}

fn render_table(records: &[&PromptRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:<20} {:<40} {:<20} PROMPT",
        "ID", "NAME", "COMMENT", "TAGS"
    );
    for record in records {
        let comment = if record.has_comment() {
            record.comment.as_str()
        } else {
            "-"
        };
        let _ = writeln!(
            out,
            "{:<15} {:<20} {:<40} {:<20} {}",
            record.id,
            record.name,
            comment,
            record.tags.join(","),
            record.prompt.lines().next().unwrap_or(""),
        );
    }
    out
}
