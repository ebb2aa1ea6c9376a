//! Barcode input handling.
//!
//! Hand scanners act like keyboards: they type the code quickly and finish with
//! Enter. `ScanBuffer` collects those keystrokes; `normalize_barcode` checks
//! the result before it is used in `GET /api/products/barcode/{code}`.

use stockroom_core::{DomainError, DomainResult};
use tracing::debug;

const MAX_LEN: usize = 64;

/// Trim the code and reject empty codes, inner whitespace and control
/// characters.
pub fn normalize_barcode(raw: &str) -> DomainResult<String> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(DomainError::validation("barcode", "is required"));
    }
    if code.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(DomainError::validation("barcode", "must not contain spaces"));
    }
    if code.chars().count() > MAX_LEN {
        return Err(DomainError::validation(
            "barcode",
            format!("must be at most {MAX_LEN} characters"),
        ));
    }
    Ok(code.to_string())
}

/// Keystroke accumulator for a scanner input field.
#[derive(Debug, Clone, Default)]
pub struct ScanBuffer {
    pending: String,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.pending.push(c);
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Enter pressed: take the buffered code.
    ///
    /// The buffer is emptied either way so a bad scan does not leak into the
    /// next one.
    pub fn submit(&mut self) -> DomainResult<String> {
        let raw = std::mem::take(&mut self.pending);
        let code = normalize_barcode(&raw)?;
        debug!(code = %code, "barcode scanned");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_barcode("  4006381333931\n").unwrap(), "4006381333931");
    }

    #[test]
    fn rejects_empty_and_inner_spaces() {
        let empty = normalize_barcode("   ").unwrap_err();
        assert_eq!(
            empty.field_errors().map(|e| e.fields()),
            Some(vec!["barcode"])
        );
        assert!(normalize_barcode("400 638").is_err());
    }

    #[test]
    fn rejects_overlong_codes() {
        assert!(normalize_barcode(&"9".repeat(MAX_LEN)).is_ok());
        assert!(normalize_barcode(&"9".repeat(MAX_LEN + 1)).is_err());
    }

    #[test]
    fn scan_buffer_emits_on_submit_and_resets() {
        let mut buf = ScanBuffer::new();
        for c in "PW-1".chars() {
            buf.push(c);
        }
        buf.push('\r');
        assert_eq!(buf.pending(), "PW-1");
        assert_eq!(buf.submit().unwrap(), "PW-1");
        assert_eq!(buf.pending(), "");

        buf.push(' ');
        assert!(buf.submit().is_err());
        assert_eq!(buf.pending(), "");
    }
}
