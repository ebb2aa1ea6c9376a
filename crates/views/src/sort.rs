//! Optional explicit ordering.
//!
//! Screens default to server order. When a sort key is requested the sort is
//! stable, so ties keep their server order.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Requested ordering on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> SortSpec<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Entities that expose sortable fields.
pub trait Sortable {
    type Field: Copy + PartialEq + core::fmt::Debug;

    fn compare_by(&self, other: &Self, field: Self::Field) -> Ordering;
}

/// Stable in-place sort of a derived view. `None` keeps the current order.
pub fn sort_view<T: Sortable>(items: &mut [&T], spec: Option<SortSpec<T::Field>>) {
    let Some(spec) = spec else {
        return;
    };
    items.sort_by(|a, b| {
        let ord = a.compare_by(b, spec.field);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
