use serde::{Deserialize, Serialize};

use stockroom_core::Entity;
use stockroom_core::lenient::{blank_as_none, null_as_default};
use stockroom_products::ProductId;

stockroom_core::numeric_id!(InventoryEventId, "InventoryEventId");

/// Stock movement log entry from `GET /api/inventory/events`.
///
/// `created_at` stays a raw string: the log is best-effort and the calendar
/// decides what it can parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEvent {
    pub id: InventoryEventId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product_name: Option<String>,
    /// `receive`, `pick`, `update`, `adjust`, ... as reported by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
}

impl InventoryEvent {
    /// Short label such as `Receive 12 x Tape gun`.
    pub fn title(&self) -> String {
        let kind = match self.event_type.trim() {
            "" => "Movement".to_string(),
            t => {
                let mut chars = t.chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        };
        match self.product_name.as_deref() {
            Some(name) => format!("{kind} {} x {name}", self.quantity),
            None => format!("{kind} {}", self.quantity),
        }
    }
}

impl Entity for InventoryEvent {
    type Id = InventoryEventId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
