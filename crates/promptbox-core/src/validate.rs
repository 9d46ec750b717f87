//! Form validation. Lengths are counted in characters after trimming.

use crate::error::ValidationError;
use crate::record::{PromptDraft, PromptForm};

pub const NAME_MAX: usize = 20;
pub const COMMENT_MAX: usize = 40;
pub const PROMPT_MAX: usize = 400;
pub const TAG_MAX: usize = 10;

/// Check a raw form and normalize it into a draft.
///
/// Rules run in order (name, comment, prompt, tags) and the first failure
/// is returned. The form itself is never modified.
pub fn validate(form: &PromptForm) -> Result<PromptDraft, ValidationError> {
    let name = form.name.trim();
    if !within(name, 1, NAME_MAX) {
        return Err(ValidationError::Name);
    }

    let comment = form.comment.trim();
    if !comment.is_empty() && !within(comment, 1, COMMENT_MAX) {
        return Err(ValidationError::Comment);
    }

    let prompt = form.prompt.trim();
    if !within(prompt, 1, PROMPT_MAX) {
        return Err(ValidationError::Prompt);
    }

    let tags = parse_tags(&form.tags);
    if let Some(bad) = tags.iter().find(|t| !within(t, 1, TAG_MAX)) {
        return Err(ValidationError::Tag(bad.clone()));
    }

    Ok(PromptDraft {
        name: name.to_string(),
        comment: comment.to_string(),
        tags,
        prompt: prompt.to_string(),
    })
}

/// Split a comma-separated tag string, trimming tokens and dropping empty ones.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn within(s: &str, min: usize, max: usize) -> bool {
    let len = s.chars().count();
    len >= min && len <= max
}
