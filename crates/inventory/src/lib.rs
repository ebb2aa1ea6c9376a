//! Inventory domain module.
//!
//! Stock movements (set / pick / receive), barcode normalization for scanner
//! lookups, and the inventory event log shown on the operations calendar.
//! Pure logic only; the client crate sends the requests.

pub mod barcode;
pub mod event;
pub mod movement;

pub use barcode::{ScanBuffer, normalize_barcode};
pub use event::{InventoryEvent, InventoryEventId};
pub use movement::{MovementKind, StockMovement, StockMovementForm};
