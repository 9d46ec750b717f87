pub mod plain;
pub mod prompt_view;
