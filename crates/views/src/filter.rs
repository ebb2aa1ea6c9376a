//! Filter predicates shared by every list screen.
//!
//! An entity is retained iff every active predicate passes:
//! - text: empty search matches everything, otherwise any designated field
//!   contains the search term (case-insensitive)
//! - status: `All` matches everything, otherwise the entity decides
//! - category/tag: `All` matches everything, otherwise any of the entity's
//!   categories equals the selection (case-insensitive)
//!
//! Filtering never reorders: output preserves input order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Selection on a categorical filter. `All` is the neutral value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }
}

impl Choice<String> {
    /// Parse a menu value where `"all"` (any case) or blank is the sentinel.
    pub fn from_menu(value: &str) -> Self {
        let v = value.trim();
        if v.is_empty() || v.eq_ignore_ascii_case("all") {
            Choice::All
        } else {
            Choice::Only(v.to_string())
        }
    }
}

/// Something a list screen can filter.
pub trait Filterable {
    /// Status filter vocabulary (stock band, issue status, ...).
    type Status: Clone + PartialEq + core::fmt::Debug;

    /// Text fields the search box matches against. Absent optional fields are
    /// simply not yielded.
    fn search_fields(&self) -> Vec<&str>;

    /// Whether the entity matches a concrete (non-`All`) status selection.
    fn matches_status(&self, status: &Self::Status) -> bool;

    /// Category/tag values used by the category filter and tag menus.
    fn categories(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// User-controlled filter parameters for one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState<S> {
    pub search_term: String,
    pub status: Choice<S>,
    pub category: Choice<String>,
}

impl<S> Default for FilterState<S> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status: Choice::All,
            category: Choice::All,
        }
    }
}

impl<S> FilterState<S> {
    /// Neutral state: matches every entity.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Reset every filter field in one assignment.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns the cleared state without touching `self`.
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        self.search_term.trim().is_empty() && self.status.is_all() && self.category.is_all()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_status(mut self, status: S) -> Self {
        self.status = Choice::Only(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Choice::from_menu(&category.into());
        self
    }
}

impl<S: Clone + PartialEq> FilterState<S> {
    /// Evaluate all predicates against one entity.
    pub fn matches<T>(&self, entity: &T) -> bool
    where
        T: Filterable<Status = S>,
    {
        text_matches(entity, &self.search_term)
            && match &self.status {
                Choice::All => true,
                Choice::Only(s) => entity.matches_status(s),
            }
            && match &self.category {
                Choice::All => true,
                Choice::Only(c) => category_matches(entity, c),
            }
    }
}

fn text_matches<T: Filterable>(entity: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    entity
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn category_matches<T: Filterable>(entity: &T, wanted: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    entity
        .categories()
        .iter()
        .any(|c| c.trim().to_lowercase() == wanted)
}

/// Apply a filter state to a collection, preserving order.
pub fn filter<'a, T>(entities: &'a [T], state: &FilterState<T::Status>) -> Vec<&'a T>
where
    T: Filterable,
{
    entities.iter().filter(|e| state.matches(*e)).collect()
}

/// Distinct category/tag values for filter menus, sorted lexicographically.
///
/// Blank values are skipped.
pub fn unique_tags<T: Filterable>(entities: &[T]) -> Vec<String> {
    let set: BTreeSet<String> = entities
        .iter()
        .flat_map(|e| e.categories())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    set.into_iter().collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Level {
        Empty,
        Low,
        Full,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Item {
        pub id: u32,
        pub name: String,
        pub note: Option<String>,
        pub qty: i64,
        pub tags: Vec<String>,
    }

    pub fn item(id: u32, name: &str, qty: i64, tags: &[&str]) -> Item {
        Item {
            id,
            name: name.to_string(),
            note: None,
            qty,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    impl Filterable for Item {
        type Status = Level;

        fn search_fields(&self) -> Vec<&str> {
            let mut out = vec![self.name.as_str()];
            if let Some(n) = &self.note {
                out.push(n.as_str());
            }
            out
        }

        fn matches_status(&self, status: &Level) -> bool {
            let actual = match self.qty {
                0 => Level::Empty,
                1..=5 => Level::Low,
                _ => Level::Full,
            };
            actual == *status
        }

        fn categories(&self) -> Vec<&str> {
            self.tags.iter().map(String::as_str).collect()
        }
    }

    impl stockroom_core::Entity for Item {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum ItemField {
        Name,
        Qty,
    }

    impl crate::sort::Sortable for Item {
        type Field = ItemField;

        fn compare_by(&self, other: &Self, field: ItemField) -> core::cmp::Ordering {
            match field {
                ItemField::Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
                ItemField::Qty => self.qty.cmp(&other.qty),
            }
        }
    }
}
