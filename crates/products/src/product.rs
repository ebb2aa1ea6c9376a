use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::Entity;
use stockroom_core::lenient::{
    blank_as_none, lenient_datetime, lenient_f64, lenient_i64, null_as_default, string_list,
};
use stockroom_views::{CollectionScreen, Filterable, Sortable};

use crate::stock::{BoxBreakdown, StockStatus, box_breakdown, stock_percentage, stock_status};

stockroom_core::numeric_id!(
    /// Product identifier assigned by the backend.
    ProductId,
    "ProductId"
);

/// Image shown when a product has no image (or it fails to load).
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-product.svg";

/// Product as returned by `GET /api/products`.
///
/// Every field except `id` tolerates being missing or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_stock_level: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub units_per_box: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Bare product with only identity, name and SKU set.
    pub fn new(id: ProductId, name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sku: sku.into(),
            barcode: None,
            description: None,
            category: None,
            tags: Vec::new(),
            current_stock: 0,
            min_stock_level: 0,
            units_per_box: None,
            price: None,
            location: None,
            image_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_stock(mut self, current: i64, min: i64) -> Self {
        self.current_stock = current;
        self.min_stock_level = min;
        self
    }

    pub fn stock_status(&self) -> StockStatus {
        stock_status(self.current_stock, self.min_stock_level)
    }

    pub fn stock_percentage(&self) -> f64 {
        stock_percentage(self.current_stock, self.min_stock_level)
    }

    pub fn boxes(&self) -> Option<BoxBreakdown> {
        box_breakdown(self.current_stock, self.units_per_box)
    }

    /// Absolute image URL, or the placeholder when the product has none.
    pub fn image_url(&self, base_url: &str) -> String {
        match self.image_path.as_deref() {
            None => PLACEHOLDER_IMAGE.to_string(),
            Some(path) if path.starts_with("http://") || path.starts_with("https://") => {
                path.to_string()
            }
            Some(path) => format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Filterable for Product {
    type Status = StockStatus;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.sku.as_str()];
        fields.extend(self.barcode.as_deref());
        fields.extend(self.description.as_deref());
        fields
    }

    fn matches_status(&self, status: &StockStatus) -> bool {
        self.stock_status() == *status
    }

    /// Tags plus the category, so either can drive the tag menu.
    fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        out.extend(self.category.as_deref());
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortField {
    Name,
    Sku,
    Stock,
    UpdatedAt,
}

impl Sortable for Product {
    type Field = ProductSortField;

    fn compare_by(&self, other: &Self, field: ProductSortField) -> core::cmp::Ordering {
        match field {
            ProductSortField::Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            ProductSortField::Sku => self.sku.cmp(&other.sku),
            ProductSortField::Stock => self.current_stock.cmp(&other.current_stock),
            ProductSortField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}

/// The product list screen (grid/table/list with stock and tag filters).
pub type ProductScreen = CollectionScreen<Product>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_views::{Choice, FilterState, ViewMode, filter};

    fn scenario() -> Vec<Product> {
        vec![
            Product::new(ProductId::new(1), "Pallet wrap", "PW-1").with_stock(0, 5),
            Product::new(ProductId::new(2), "Box cutter", "BC-2").with_stock(3, 5),
            Product::new(ProductId::new(3), "Tape gun", "TG-3").with_stock(10, 5),
        ]
    }

    #[test]
    fn low_stock_filter_scenario() {
        let products = scenario();
        let state = FilterState::neutral().with_status(StockStatus::Low);
        let out = filter(&products, &state);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, ProductId::new(2));
    }

    #[test]
    fn search_covers_barcode_and_description() {
        let mut products = scenario();
        products[0].barcode = Some("4006381333931".into());
        products[2].description = Some("Heavy duty dispenser".into());
        let by_code = filter(&products, &FilterState::neutral().with_search("40063813"));
        assert_eq!(by_code[0].id, ProductId::new(1));
        let by_desc = filter(&products, &FilterState::neutral().with_search("DISPENSER"));
        assert_eq!(by_desc[0].id, ProductId::new(3));
    }

    #[test]
    fn tag_filter_includes_category() {
        let mut products = scenario();
        products[1].category = Some("Tools".into());
        products[2].tags = vec!["tools".into(), "handheld".into()];
        let state: FilterState<StockStatus> = FilterState::neutral().with_category("TOOLS");
        let ids: Vec<i64> = filter(&products, &state).iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn lenient_payload_parses() {
        let json = r#"{
            "id": 9,
            "name": "Stretch film",
            "sku": null,
            "currentStock": null,
            "minStockLevel": 4,
            "unitsPerBox": 6,
            "tags": "[\"film\",\"packing\"]",
            "imagePath": "",
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.sku, "");
        assert_eq!(p.current_stock, 0);
        assert_eq!(p.tags, vec!["film", "packing"]);
        assert!(p.image_path.is_none());
        assert_eq!(p.stock_status(), StockStatus::Out);
        assert_eq!(p.boxes().map(|b| b.boxes), Some(0));
    }

    #[test]
    fn image_url_falls_back_to_placeholder() {
        let mut p = Product::new(ProductId::new(1), "X", "X-1");
        assert_eq!(p.image_url("http://api"), PLACEHOLDER_IMAGE);
        p.image_path = Some("/uploads/x.png".into());
        assert_eq!(p.image_url("http://api/"), "http://api/uploads/x.png");
        p.image_path = Some("https://cdn.example/x.png".into());
        assert_eq!(p.image_url("http://api"), "https://cdn.example/x.png");
    }

    #[test]
    fn product_screen_renders_in_every_mode() {
        let products = scenario();
        let mut screen = ProductScreen::new();
        screen.set_status(Choice::Only(StockStatus::In));
        for mode in ViewMode::ALL {
            screen.set_view_mode(mode);
            let v = screen.view(Some(products.as_slice()));
            assert_eq!(v.rendering.items.len(), 1);
            assert_eq!(v.rendering.items[0].id, ProductId::new(3));
        }
    }
}
