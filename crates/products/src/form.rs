//! Product create/edit form.
//!
//! The form holds raw user input; `validate` turns it into a payload ready for
//! dispatch or into per-field errors. Nothing reaches the network unless
//! validation passes.

use serde::Serialize;

use stockroom_core::{Validated, Validator};
use stockroom_views::{Attachment, MultipartForm, WireBody};

use crate::product::Product;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub sku: String,
    pub barcode: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub current_stock: i64,
    pub min_stock_level: i64,
    pub units_per_box: Option<i64>,
    pub price: Option<f64>,
    pub location: String,
    pub image: Option<Attachment>,
}

/// Validated product fields, serialized as the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub current_stock: i64,
    pub min_stock_level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_box: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A validated create/update submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub fields: ProductFields,
    pub image: Option<Attachment>,
}

fn optional(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

impl ProductForm {
    /// Prefill the form for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            barcode: product.barcode.clone().unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            tags: product.tags.clone(),
            current_stock: product.current_stock,
            min_stock_level: product.min_stock_level,
            units_per_box: product.units_per_box,
            price: product.price,
            location: product.location.clone().unwrap_or_default(),
            image: None,
        }
    }

    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| !t.eq_ignore_ascii_case(tag));
    }

    pub fn validate(&self) -> Validated<ProductPayload> {
        let mut v = Validator::new();
        v.min_len("name", &self.name, 2)
            .max_len("name", &self.name, 200)
            .min_len("sku", &self.sku, 2)
            .non_negative("currentStock", self.current_stock)
            .non_negative("minStockLevel", self.min_stock_level);
        if let Some(units) = self.units_per_box {
            v.at_least("unitsPerBox", units, 1);
        }
        if let Some(price) = self.price {
            v.non_negative_f64("price", price);
        }
        if let Some(barcode) = optional(&self.barcode) {
            v.check(
                !barcode.chars().any(char::is_whitespace),
                "barcode",
                "must not contain spaces",
            );
        }
        if let Some(image) = &self.image {
            image.validate_image(&mut v, "image");
        }

        v.finish(ProductPayload {
            fields: ProductFields {
                name: self.name.trim().to_string(),
                sku: self.sku.trim().to_string(),
                barcode: optional(&self.barcode),
                description: optional(&self.description),
                category: optional(&self.category),
                tags: self.tags.clone(),
                current_stock: self.current_stock,
                min_stock_level: self.min_stock_level,
                units_per_box: self.units_per_box,
                price: self.price,
                location: optional(&self.location),
            },
            image: self.image.clone(),
        })
    }
}

impl ProductPayload {
    /// JSON when there is no image, multipart otherwise.
    pub fn into_body(self) -> WireBody {
        let Some(image) = self.image else {
            return WireBody::Json(
                serde_json::to_value(&self.fields).unwrap_or(serde_json::Value::Null),
            );
        };
        let f = self.fields;
        let mut form = MultipartForm::new();
        form.text("name", f.name)
            .text("sku", f.sku)
            .text_opt("barcode", f.barcode)
            .text_opt("description", f.description)
            .text_opt("category", f.category)
            .list("tags", &f.tags)
            .text("currentStock", f.current_stock.to_string())
            .text("minStockLevel", f.min_stock_level.to_string())
            .text_opt("unitsPerBox", f.units_per_box)
            .text_opt("price", f.price)
            .text_opt("location", f.location)
            .file("image", image);
        WireBody::Multipart(form)
    }
}
