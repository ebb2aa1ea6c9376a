//! Products domain module.
//!
//! This crate contains the product catalog as the client sees it: the lenient
//! read model, derived stock values (status band, fill percentage, box
//! breakdown), the create/edit form and its validation, and categories.
//! Pure logic only (no IO, no HTTP).

pub mod category;
pub mod form;
pub mod product;
pub mod stock;

pub use category::{Category, CategoryId, category_names};
pub use form::{ProductFields, ProductForm, ProductPayload};
pub use product::{PLACEHOLDER_IMAGE, Product, ProductId, ProductScreen, ProductSortField};
pub use stock::{BoxBreakdown, StockStatus, box_breakdown, stock_percentage, stock_status};
