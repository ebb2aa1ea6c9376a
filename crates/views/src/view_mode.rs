//! View-mode selection.
//!
//! Grid, table and list are three layouts of the same filtered set. Switching
//! modes never touches the collection or the filter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Table,
    List,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Grid, ViewMode::Table, ViewMode::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::Table => "table",
            ViewMode::List => "list",
        }
    }
}

impl core::str::FromStr for ViewMode {
    type Err = stockroom_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "table" => Ok(ViewMode::Table),
            "list" => Ok(ViewMode::List),
            other => Err(stockroom_core::DomainError::validation(
                "viewMode",
                format!("unknown view mode '{other}'"),
            )),
        }
    }
}

/// A filtered set bound to the layout it should be drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering<'a, T> {
    pub mode: ViewMode,
    pub items: Vec<&'a T>,
}

impl<'a, T> Rendering<'a, T> {
    /// Rows of at most `columns` items, for the grid layout.
    pub fn rows(&self, columns: usize) -> Vec<&[&'a T]> {
        self.items.chunks(columns.max(1)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bind a view to a mode. The item set is passed through unchanged.
pub fn render<'a, T>(mode: ViewMode, items: Vec<&'a T>) -> Rendering<'a, T> {
    Rendering { mode, items }
}
