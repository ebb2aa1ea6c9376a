use serde::{Deserialize, Serialize};

use stockroom_core::{Validated, Validator};
use stockroom_products::ProductId;

/// Kind of stock movement; each maps to `POST /api/inventory/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Set the on-hand quantity (stock count correction).
    Update,
    /// Remove units for an order.
    Pick,
    /// Add units from a delivery.
    Receive,
}

impl MovementKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            MovementKind::Update => "update",
            MovementKind::Pick => "pick",
            MovementKind::Receive => "receive",
        }
    }
}

/// Raw input from the scan/adjust dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovementForm {
    pub kind: MovementKind,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    pub notes: String,
    /// Stock shown on screen when the dialog opened, if the product was loaded.
    pub known_stock: Option<i64>,
}

/// Validated movement; serializes to the request body for its endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum StockMovement {
    Update {
        product_id: ProductId,
        new_stock: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Pick {
        product_id: ProductId,
        quantity: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Receive {
        product_id: ProductId,
        quantity: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl StockMovementForm {
    pub fn new(kind: MovementKind) -> Self {
        Self {
            kind,
            product_id: None,
            quantity: 0,
            notes: String::new(),
            known_stock: None,
        }
    }

    /// Bind the form to a scanned/selected product.
    pub fn for_product(mut self, id: ProductId, current_stock: i64) -> Self {
        self.product_id = Some(id);
        self.known_stock = Some(current_stock);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Pick and receive move at least one unit; update sets a count of zero or
    /// more. A pick larger than the known stock is rejected.
    pub fn validate(&self) -> Validated<StockMovement> {
        let mut v = Validator::new();
        v.present("productId", self.product_id.as_ref());
        match self.kind {
            MovementKind::Update => {
                v.non_negative("quantity", self.quantity);
            }
            MovementKind::Pick | MovementKind::Receive => {
                v.at_least("quantity", self.quantity, 1);
            }
        }
        if let (MovementKind::Pick, Some(stock)) = (self.kind, self.known_stock) {
            v.check(
                self.quantity <= stock,
                "quantity",
                format!("cannot pick more than the {stock} units in stock"),
            );
        }
        v.max_len("notes", &self.notes, 500);

        let notes = self.notes.trim();
        let notes = (!notes.is_empty()).then(|| notes.to_string());
        let product_id = self.product_id.unwrap_or(ProductId::new(0));
        let quantity = self.quantity;
        v.finish(match self.kind {
            MovementKind::Update => StockMovement::Update {
                product_id,
                new_stock: quantity,
                notes,
            },
            MovementKind::Pick => StockMovement::Pick {
                product_id,
                quantity,
                notes,
            },
            MovementKind::Receive => StockMovement::Receive {
                product_id,
                quantity,
                notes,
            },
        })
    }
}

impl StockMovement {
    pub fn kind(&self) -> MovementKind {
        match self {
            StockMovement::Update { .. } => MovementKind::Update,
            StockMovement::Pick { .. } => MovementKind::Pick,
            StockMovement::Receive { .. } => MovementKind::Receive,
        }
    }

    pub fn product_id(&self) -> ProductId {
        match self {
            StockMovement::Update { product_id, .. }
            | StockMovement::Pick { product_id, .. }
            | StockMovement::Receive { product_id, .. } => *product_id,
        }
    }

    /// Stock after the backend applies this movement, for preview only.
    pub fn projected_stock(&self, current: i64) -> i64 {
        match self {
            StockMovement::Update { new_stock, .. } => *new_stock,
            StockMovement::Pick { quantity, .. } => current - quantity,
            StockMovement::Receive { quantity, .. } => current + quantity,
        }
    }
}
