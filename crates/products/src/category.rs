use serde::{Deserialize, Serialize};

use stockroom_core::Entity;
use stockroom_core::lenient::{blank_as_none, null_as_default};

stockroom_core::numeric_id!(CategoryId, "CategoryId");

/// Category as returned by `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Category names for the form's select box, sorted and without blanks.
pub fn category_names(categories: &[Category]) -> Vec<&str> {
    let mut names: Vec<&str> = categories
        .iter()
        .map(|c| c.name.trim())
        .filter(|n| !n.is_empty())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_and_deduplicated() {
        let cats: Vec<Category> = serde_json::from_str(
            r#"[{"id":1,"name":"Tools"},{"id":2,"name":" "},{"id":3,"name":"Packaging"},{"id":4,"name":"Tools"}]"#,
        )
        .unwrap();
        assert_eq!(category_names(&cats), vec!["Packaging", "Tools"]);
    }
}
