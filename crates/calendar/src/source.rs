//! Calendar source records.
//!
//! Each backend collection is read leniently: every field but the id may be
//! missing, and dates stay raw strings until aggregation decides whether they
//! parse.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use stockroom_core::lenient::{blank_as_none, lenient_f64};
use stockroom_inventory::InventoryEvent;

use crate::date::first_date;
use crate::event::EventCategory;

/// Backend collection a calendar event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Order,
    SupplierPayment,
    SupplierInvoice,
    CallLog,
    InventoryEvent,
    ProductionBatch,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Order,
        SourceKind::SupplierPayment,
        SourceKind::SupplierInvoice,
        SourceKind::CallLog,
        SourceKind::InventoryEvent,
        SourceKind::ProductionBatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Order => "order",
            SourceKind::SupplierPayment => "supplier_payment",
            SourceKind::SupplierInvoice => "supplier_invoice",
            SourceKind::CallLog => "call_log",
            SourceKind::InventoryEvent => "inventory_event",
            SourceKind::ProductionBatch => "production_batch",
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            SourceKind::Order => EventCategory::Orders,
            SourceKind::SupplierPayment | SourceKind::SupplierInvoice => EventCategory::Payments,
            SourceKind::CallLog => EventCategory::Calls,
            SourceKind::InventoryEvent => EventCategory::Inventory,
            SourceKind::ProductionBatch => EventCategory::Production,
        }
    }
}

/// A record that can appear on the calendar.
pub trait CalendarSource {
    const KIND: SourceKind;

    /// Identifier unique within the source.
    fn record_id(&self) -> String;

    fn title(&self) -> String;

    /// Start timestamp, or `None` when no date field parses.
    fn start(&self) -> Option<NaiveDateTime>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Ids arrive as numbers or strings; both become strings.
fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn or_fallback(value: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    value.map(str::to_string).unwrap_or_else(fallback)
}

/// `GET /api/orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub delivery_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub order_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
}

impl CalendarSource for OrderRecord {
    const KIND: SourceKind = SourceKind::Order;

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> String {
        let number = or_fallback(self.order_number.as_deref(), || format!("#{}", self.id));
        match self.customer_name.as_deref() {
            Some(customer) => format!("Order {number} ({customer})"),
            None => format!("Order {number}"),
        }
    }

    /// Delivery date first: that is when the warehouse has to act.
    fn start(&self) -> Option<NaiveDateTime> {
        first_date([
            self.delivery_date.as_deref(),
            self.order_date.as_deref(),
            self.created_at.as_deref(),
        ])
    }
}

/// `GET /api/supplier-payments/payments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayment {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub supplier_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub payment_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<String>,
}

impl CalendarSource for SupplierPayment {
    const KIND: SourceKind = SourceKind::SupplierPayment;

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> String {
        let supplier = or_fallback(self.supplier_name.as_deref(), || "supplier".into());
        match self.amount {
            Some(amount) => format!("Payment to {supplier}: {amount:.2}"),
            None => format!("Payment to {supplier}"),
        }
    }

    fn start(&self) -> Option<NaiveDateTime> {
        first_date([self.payment_date.as_deref(), self.due_date.as_deref()])
    }
}

/// `GET /api/supplier-payments/invoices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInvoice {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub invoice_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub supplier_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub invoice_date: Option<String>,
}

impl CalendarSource for SupplierInvoice {
    const KIND: SourceKind = SourceKind::SupplierInvoice;

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> String {
        let number = or_fallback(self.invoice_number.as_deref(), || format!("#{}", self.id));
        match self.supplier_name.as_deref() {
            Some(supplier) => format!("Invoice {number} due ({supplier})"),
            None => format!("Invoice {number} due"),
        }
    }

    fn start(&self) -> Option<NaiveDateTime> {
        first_date([self.due_date.as_deref(), self.invoice_date.as_deref()])
    }
}

/// `GET /api/call-logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub follow_up_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub call_date: Option<String>,
}

impl CalendarSource for CallLog {
    const KIND: SourceKind = SourceKind::CallLog;

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> String {
        match (self.contact_name.as_deref(), self.subject.as_deref()) {
            (Some(who), Some(what)) => format!("Call {who}: {what}"),
            (Some(who), None) => format!("Call {who}"),
            (None, Some(what)) => format!("Call: {what}"),
            (None, None) => "Call".to_string(),
        }
    }

    /// A scheduled follow-up wins over the date the call was logged.
    fn start(&self) -> Option<NaiveDateTime> {
        first_date([self.follow_up_date.as_deref(), self.call_date.as_deref()])
    }
}

impl CalendarSource for InventoryEvent {
    const KIND: SourceKind = SourceKind::InventoryEvent;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn title(&self) -> String {
        InventoryEvent::title(self)
    }

    fn start(&self) -> Option<NaiveDateTime> {
        first_date([self.created_at.as_deref()])
    }
}

/// `GET /api/production/batches`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionBatch {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub batch_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub planned_date: Option<String>,
}

impl CalendarSource for ProductionBatch {
    const KIND: SourceKind = SourceKind::ProductionBatch;

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> String {
        let batch = or_fallback(self.batch_number.as_deref(), || format!("#{}", self.id));
        match self.product_name.as_deref() {
            Some(product) => format!("Batch {batch}: {product}"),
            None => format!("Batch {batch}"),
        }
    }

    fn start(&self) -> Option<NaiveDateTime> {
        first_date([self.start_date.as_deref(), self.planned_date.as_deref()])
    }
}
