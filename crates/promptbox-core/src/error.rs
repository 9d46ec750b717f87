use thiserror::Error;

use crate::validate::{COMMENT_MAX, NAME_MAX, PROMPT_MAX, TAG_MAX};

/// A form submission that failed validation. The first violated rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be 1-{NAME_MAX} characters")]
    Name,

    #[error("comment must be 1-{COMMENT_MAX} characters")]
    Comment,

    #[error("prompt must be 1-{PROMPT_MAX} characters")]
    Prompt,

    #[error("each tag must be 1-{TAG_MAX} characters (got \"{0}\")")]
    Tag(String),
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Name => "name",
            ValidationError::Comment => "comment",
            ValidationError::Prompt => "prompt",
            ValidationError::Tag(_) => "tags",
        }
    }
}
