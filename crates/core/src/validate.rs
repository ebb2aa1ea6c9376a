//! Field-level form validation.
//!
//! Forms are validated into a tagged union before anything is dispatched:
//! `Ok(payload)` or `Err(FieldErrors)`. Validation is pure; it never touches
//! the network or UI state.

use serde::Serialize;

/// Outcome of validating a form into a payload.
pub type Validated<T> = Result<T, FieldErrors>;

/// Per-field validation messages, in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

/// A single failed check on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Messages reported for one field (for inline rendering next to the input).
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e.field == field)
    }

    /// Fields that have at least one error, deduplicated, in report order.
    pub fn fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.field.as_str()) {
                out.push(e.field.as_str());
            }
        }
        out
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for e in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Accumulating validator.
///
/// Every check records a message instead of returning early, so the user sees
/// all problems with a form at once.
///
/// ```
/// use stockroom_core::Validator;
///
/// let mut v = Validator::new();
/// v.min_len("name", "A", 2);
/// v.non_negative("currentStock", -1);
/// let errors = v.finish(()).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field must contain a non-blank value.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(field, "is required");
        }
        self
    }

    /// Optional field must be present.
    pub fn present<T>(&mut self, field: &str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.errors.push(field, "is required");
        }
        self
    }

    /// Field must have at least `min` characters after trimming.
    ///
    /// A blank value reports "is required" rather than a length message.
    pub fn min_len(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len == 0 {
            self.errors.push(field, "is required");
        } else if len < min {
            self.errors
                .push(field, format!("must be at least {min} characters"));
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.errors
                .push(field, format!("must be at most {max} characters"));
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: i64) -> &mut Self {
        if value < 0 {
            self.errors.push(field, "must be zero or greater");
        }
        self
    }

    pub fn non_negative_f64(&mut self, field: &str, value: f64) -> &mut Self {
        if !value.is_finite() || value < 0.0 {
            self.errors.push(field, "must be zero or greater");
        }
        self
    }

    pub fn at_least(&mut self, field: &str, value: i64, min: i64) -> &mut Self {
        if value < min {
            self.errors.push(field, format!("must be at least {min}"));
        }
        self
    }

    /// Record an arbitrary failed check.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(field, message);
        }
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Produce the validated payload, or every recorded error.
    pub fn finish<T>(self, value: T) -> Validated<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            tracing::debug!(errors = %self.errors, "form validation failed");
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_form_passes_through() {
        let mut v = Validator::new();
        v.required("name", "Widget").min_len("name", "Widget", 2).non_negative("qty", 0);
        assert_eq!(v.finish(5), Ok(5));
    }

    #[test]
    fn blank_reports_required_not_length() {
        let mut v = Validator::new();
        v.min_len("name", "   ", 2);
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.for_field("name").collect::<Vec<_>>(), vec!["is required"]);
    }

    #[test]
    fn accumulates_all_errors() {
        let mut v = Validator::new();
        v.min_len("name", "A", 2)
            .non_negative("currentStock", -3)
            .at_least("quantity", 0, 1)
            .check(false, "image", "too large");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.fields(), vec!["name", "currentStock", "quantity", "image"]);
        assert!(errors.to_string().contains("name: must be at least 2 characters"));
    }

    #[test]
    fn non_negative_f64_rejects_nan() {
        let mut v = Validator::new();
        v.non_negative_f64("price", f64::NAN);
        assert!(v.has_errors());
    }

    proptest::proptest! {
        #[test]
        fn non_negative_matches_sign(n in proptest::num::i64::ANY) {
            let mut v = Validator::new();
            v.non_negative("qty", n);
            proptest::prop_assert_eq!(v.finish(n).is_ok(), n >= 0);
        }

        #[test]
        fn min_len_counts_trimmed_chars(s in "[ a-zé]{0,12}", min in 1usize..6) {
            let mut v = Validator::new();
            v.min_len("name", &s, min);
            let ok = s.trim().chars().count() >= min;
            proptest::prop_assert_eq!(v.finish(()).is_ok(), ok);
        }
    }
}
