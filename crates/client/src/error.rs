use thiserror::Error;

use stockroom_core::{DomainError, FieldErrors};

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced to the user as toasts or inline form errors.
///
/// None of these are fatal: the screen keeps rendering whatever the store
/// last held.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    /// Connection refused, DNS, timeout, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` is the server-provided detail.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The form failed client-side validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The screen refused the submission (wrong dialog, one already in flight).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The response arrived after the submission was cancelled or replaced.
    #[error("response superseded")]
    Superseded,
}

impl ClientError {
    pub fn api(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: server_message(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Toast text: a generic sentence plus the server detail when there is one.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Api { message, .. } if message.is_empty() => {
                "The request failed.".to_string()
            }
            ClientError::Api { message, .. } => format!("The request failed: {message}"),
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ClientError::Validation(errors) => format!("Please fix the form: {errors}"),
            ClientError::Rejected(reason) => format!("Action not available: {reason}"),
            ClientError::Superseded => "The action was cancelled.".to_string(),
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(errors) => ClientError::Validation(errors),
            other => ClientError::Rejected(other.to_string()),
        }
    }
}

impl From<FieldErrors> for ClientError {
    fn from(value: FieldErrors) -> Self {
        ClientError::Validation(value)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        ClientError::Decode(value.to_string())
    }
}

/// Extract the detail from an error body: `{"message": ..}` or `{"error": ..}`
/// when the body is JSON, the trimmed raw text otherwise.
pub fn server_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error", "detail"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
                    return s.trim().to_string();
                }
                Some(serde_json::Value::Object(inner)) => {
                    if let Some(serde_json::Value::String(s)) = inner.get("message") {
                        return s.trim().to_string();
                    }
                }
                _ => {}
            }
        }
    }
    trimmed.to_string()
}
