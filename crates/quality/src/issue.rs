use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::Entity;
use stockroom_core::lenient::{blank_as_none, lenient_datetime, null_as_default};
use stockroom_products::ProductId;
use stockroom_views::{CollectionScreen, Filterable, Sortable};

use crate::order::OrderId;

stockroom_core::numeric_id!(
    /// Quality issue identifier assigned by the backend.
    QualityIssueId,
    "QualityIssueId"
);

/// Issue lifecycle. Unknown or missing values read as `Open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Resolved,
    #[default]
    #[serde(other)]
    Open,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Damaged,
    WrongItem,
    MissingItem,
    Defective,
    Expired,
    #[default]
    #[serde(other)]
    Other,
}

impl IssueType {
    pub const ALL: [IssueType; 6] = [
        IssueType::Damaged,
        IssueType::WrongItem,
        IssueType::MissingItem,
        IssueType::Defective,
        IssueType::Expired,
        IssueType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Damaged => "damaged",
            IssueType::WrongItem => "wrong_item",
            IssueType::MissingItem => "missing_item",
            IssueType::Defective => "defective",
            IssueType::Expired => "expired",
            IssueType::Other => "other",
        }
    }
}

/// Unknown severities read as `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Issue as returned by `GET /api/order-quality`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIssue {
    pub id: QualityIssueId,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_number: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issue_type: IssueType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: IssueStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity_affected: i64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inventory_adjusted: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub reported_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl QualityIssue {
    pub fn new(id: QualityIssueId, order_number: impl Into<String>, issue_type: IssueType) -> Self {
        Self {
            id,
            order_id: None,
            order_number: order_number.into(),
            product_id: None,
            product_name: None,
            issue_type,
            severity: Severity::default(),
            status: IssueStatus::Open,
            description: String::new(),
            quantity_affected: 0,
            resolution: None,
            inventory_adjusted: false,
            reported_at: None,
            resolved_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == IssueStatus::Open
    }

    /// Affected units can be put back into (or written off from) stock once,
    /// and only when the issue names a product.
    pub fn can_adjust_inventory(&self) -> bool {
        self.product_id.is_some() && !self.inventory_adjusted && self.quantity_affected > 0
    }
}

impl Entity for QualityIssue {
    type Id = QualityIssueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Filterable for QualityIssue {
    type Status = IssueStatus;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.order_number.as_str(), self.description.as_str()];
        fields.extend(self.product_name.as_deref());
        fields
    }

    fn matches_status(&self, status: &IssueStatus) -> bool {
        self.status == *status
    }

    /// The issue type drives the second filter menu.
    fn categories(&self) -> Vec<&str> {
        vec![self.issue_type.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualitySortField {
    ReportedAt,
    Severity,
    OrderNumber,
}

impl Sortable for QualityIssue {
    type Field = QualitySortField;

    fn compare_by(&self, other: &Self, field: QualitySortField) -> core::cmp::Ordering {
        match field {
            QualitySortField::ReportedAt => self.reported_at.cmp(&other.reported_at),
            QualitySortField::Severity => self.severity.cmp(&other.severity),
            QualitySortField::OrderNumber => self.order_number.cmp(&other.order_number),
        }
    }
}

/// The quality issue list with status and issue type filters.
pub type QualityScreen = CollectionScreen<QualityIssue>;
