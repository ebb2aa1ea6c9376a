//! `stockroom-core`: shared building blocks for the warehouse client.
//!
//! This crate contains **pure** primitives (no IO): entity identity, the domain
//! error model, lenient payload helpers and the field-level validation result
//! used by every form.

pub mod entity;
pub mod error;
pub mod id;
pub mod lenient;
pub mod validate;

pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use validate::{FieldErrors, Validated, Validator};
