//! Operations calendar.
//!
//! Orders, supplier payments and invoices, call logs, inventory events and
//! production batches are folded into one list of dated, color-coded events.
//! Records without a usable date are left off; a source that fails to load
//! only hides its own events.

pub mod aggregate;
pub mod date;
pub mod event;
pub mod source;
pub mod view;

pub use aggregate::{Aggregation, CalendarSources, SourceFeed, SourceReport, aggregate};
pub use date::parse_date;
pub use event::{CalendarEvent, EventCategory, EventKey};
pub use source::{
    CalendarSource, CallLog, OrderRecord, ProductionBatch, SourceKind, SupplierInvoice,
    SupplierPayment,
};
pub use view::{CalendarScreen, CategoryToggles, MonthFrame, group_by_category, group_by_day};
