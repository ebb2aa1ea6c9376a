//! Order-quality / defect-tracking domain.
//!
//! Issues are reported against an order, filtered on the quality screen by
//! status and issue type, and resolved with an optional inventory adjustment
//! (restock or write-off of the affected units).

pub mod form;
pub mod issue;
pub mod order;
pub mod stats;

pub use form::{
    InventoryAdjustment, QualityIssueFields, QualityIssueForm, QualityIssuePayload, ResolveIssue,
};
pub use issue::{
    IssueStatus, IssueType, QualityIssue, QualityIssueId, QualityScreen, QualitySortField, Severity,
};
pub use order::{OrderId, OrderSummary};
pub use stats::QualityStats;
