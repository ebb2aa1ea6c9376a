use serde::{Deserialize, Serialize};

use stockroom_core::lenient::{blank_as_none, lenient_f64, null_as_default};

stockroom_core::numeric_id!(OrderId, "OrderId");

/// Order header returned by `GET /api/orders/by-number/{n}` and
/// `GET /api/orders/search?q=`, used to prefill a quality report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_number: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,
}

impl OrderSummary {
    /// `SO-1001 (Acme Ltd)` for the search dropdown.
    pub fn label(&self) -> String {
        match self.customer_name.as_deref() {
            Some(customer) => format!("{} ({customer})", self.order_number),
            None => self.order_number.clone(),
        }
    }
}
