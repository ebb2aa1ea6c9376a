//! Quality report, resolution and inventory adjustment forms.

use serde::Serialize;

use stockroom_core::{Validated, Validator};
use stockroom_products::ProductId;
use stockroom_views::{Attachment, MultipartForm, WireBody};

use crate::issue::{IssueType, QualityIssue, Severity};
use crate::order::{OrderId, OrderSummary};

/// New quality report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityIssueForm {
    pub order_number: String,
    pub order_id: Option<OrderId>,
    pub product_id: Option<ProductId>,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub quantity_affected: i64,
    /// Optional photo of the defect.
    pub photo: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIssueFields {
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub quantity_affected: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityIssuePayload {
    pub fields: QualityIssueFields,
    pub photo: Option<Attachment>,
}

impl QualityIssueForm {
    /// Fill order fields from a lookup result.
    pub fn select_order(&mut self, order: &OrderSummary) {
        self.order_id = Some(order.id);
        self.order_number = order.order_number.clone();
    }

    pub fn validate(&self) -> Validated<QualityIssuePayload> {
        let mut v = Validator::new();
        v.required("orderNumber", &self.order_number)
            .min_len("description", &self.description, 10)
            .max_len("description", &self.description, 2000)
            .at_least("quantityAffected", self.quantity_affected, 1);
        if let Some(photo) = &self.photo {
            photo.validate_image(&mut v, "photo");
        }
        v.finish(QualityIssuePayload {
            fields: QualityIssueFields {
                order_number: self.order_number.trim().to_string(),
                order_id: self.order_id,
                product_id: self.product_id,
                issue_type: self.issue_type,
                severity: self.severity,
                description: self.description.trim().to_string(),
                quantity_affected: self.quantity_affected,
            },
            photo: self.photo.clone(),
        })
    }
}

impl QualityIssuePayload {
    /// JSON unless a photo is attached.
    pub fn into_body(self) -> WireBody {
        let Some(photo) = self.photo else {
            return WireBody::Json(
                serde_json::to_value(&self.fields).unwrap_or(serde_json::Value::Null),
            );
        };
        let f = self.fields;
        let mut form = MultipartForm::new();
        form.text("orderNumber", f.order_number)
            .text_opt("orderId", f.order_id)
            .text_opt("productId", f.product_id)
            .text("issueType", f.issue_type.as_str())
            .text("severity", f.severity.as_str())
            .text("description", f.description)
            .text("quantityAffected", f.quantity_affected.to_string())
            .file("photo", photo);
        WireBody::Multipart(form)
    }
}

/// Body of `POST /api/order-quality/{id}/resolve`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveIssue {
    pub resolution: String,
}

impl ResolveIssue {
    pub fn new(resolution: impl Into<String>) -> Self {
        Self {
            resolution: resolution.into(),
        }
    }

    pub fn validate(&self) -> Validated<ResolveIssue> {
        let mut v = Validator::new();
        v.min_len("resolution", &self.resolution, 5)
            .max_len("resolution", &self.resolution, 2000);
        v.finish(ResolveIssue::new(self.resolution.trim()))
    }
}

/// Body of `POST /api/order-quality/{id}/adjust-inventory`.
///
/// `restock = true` returns the units to stock; `false` writes them off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAdjustment {
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    pub restock: bool,
}

impl InventoryAdjustment {
    /// Prefill from the issue's product and affected quantity.
    pub fn for_issue(issue: &QualityIssue, restock: bool) -> Self {
        Self {
            product_id: issue.product_id,
            quantity: issue.quantity_affected,
            restock,
        }
    }

    pub fn validate(&self) -> Validated<InventoryAdjustment> {
        let mut v = Validator::new();
        v.present("productId", self.product_id.as_ref())
            .at_least("quantity", self.quantity, 1);
        v.finish(self.clone())
    }
}
