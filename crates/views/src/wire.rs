//! Wire encodings for create/update submissions.
//!
//! A submission is one logical operation with two encodings: plain JSON, or
//! `multipart/form-data` when a binary attachment is present. The caller picks
//! the encoding from the payload; the transport just sends it.

use serde_json::Value;

use crate::attachment::Attachment;

#[derive(Debug, Clone, PartialEq)]
pub enum WireBody {
    Json(Value),
    Multipart(MultipartForm),
}

impl WireBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, WireBody::Multipart(_))
    }
}

/// Text parts in insertion order plus at most one file part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, Attachment)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn text_opt(&mut self, name: &str, value: Option<impl ToString>) -> &mut Self {
        if let Some(v) = value {
            self.fields.push((name.to_string(), v.to_string()));
        }
        self
    }

    /// Array field: one repeated part per element, plus `{name}Json` carrying
    /// the whole array as a JSON string for backends that only read one part.
    pub fn list(&mut self, name: &str, values: &[String]) -> &mut Self {
        for v in values {
            self.fields.push((name.to_string(), v.clone()));
        }
        let encoded = serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string());
        self.fields.push((format!("{name}Json"), encoded));
        self
    }

    pub fn file(&mut self, name: impl Into<String>, attachment: Attachment) -> &mut Self {
        self.file = Some((name.into(), attachment));
        self
    }

    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
