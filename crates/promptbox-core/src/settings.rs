use std::fmt;

use serde::{Deserialize, Serialize};

/// How the filtered record set is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// One card per record.
    #[default]
    Grid,
    /// A single table with one row per record.
    List,
}

impl LayoutMode {
    pub const ALL: &[LayoutMode] = &[LayoutMode::Grid, LayoutMode::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Grid => "grid",
            LayoutMode::List => "list",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutMode::Grid => "Grid",
            LayoutMode::List => "List",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(LayoutMode::Grid),
            "list" => Some(LayoutMode::List),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            LayoutMode::Grid => LayoutMode::List,
            LayoutMode::List => LayoutMode::Grid,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// User preferences persisted alongside the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub layout: LayoutMode,
    /// When false, create and update skip the persistence write.
    pub auto_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutMode::Grid,
            auto_save: true,
        }
    }
}
