//! Typed error handling for REST resource calls
//!
//! Every failure a list screen can hit is a [`ClientError`]. Callers match on
//! the variant (or on [`ClientError::kind`]) and show
//! [`ClientError::user_message`] in a notification; nothing is fatal.
//!
//! # Error Categories
//!
//! - [`ErrorKind::Transport`]: the request never produced an HTTP response
//! - [`ErrorKind::Rejected`]: the server answered 4xx (validation, auth, not found)
//! - [`ErrorKind::ServerFailure`]: the server answered 5xx
//! - [`ErrorKind::Validation`]: a draft failed client-side validation
//! - [`ErrorKind::Decode`]: the response did not match the resource schema
//! - [`ErrorKind::Cancelled`]: the owning screen went away
//! - [`ErrorKind::Config`]: the client is misconfigured
//!
//! # Example
//!
//! ```rust,ignore
//! match dispatcher.create(&draft).await {
//!     Ok(Some(lead)) => println!("Created {}", lead.id),
//!     Ok(None) => println!("Created"),
//!     Err(ClientError::Validation(fields)) => highlight(fields),
//!     Err(e) => toast(e.user_message()),
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Message shown when neither the server nor the transport says anything useful
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

pub type ClientResult<T> = Result<T, ClientError>;

/// The main error type for resource clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout, TLS error...
    #[error("Network error: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status
    #[error("Server responded with {status}{}", format_server_message(.message))]
    Server { status: u16, message: Option<String> },

    /// The response body did not match the expected schema
    #[error("Failed to decode {resource} response: {message}")]
    Decode { resource: String, message: String },

    /// A draft failed validation before any request was sent
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// The request was cancelled or its result superseded
    #[error("Request cancelled")]
    Cancelled,

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Rejected,
    ServerFailure,
    Validation,
    Decode,
    Cancelled,
    Config,
}

/// One invalid field of a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_server_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport { .. } => ErrorKind::Transport,
            ClientError::Server { status, .. } if *status < 500 => ErrorKind::Rejected,
            ClientError::Server { .. } => ErrorKind::ServerFailure,
            ClientError::Decode { .. } => ErrorKind::Decode,
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Cancelled => ErrorKind::Cancelled,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether retrying the same user action can succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Cancelled | ErrorKind::Config)
    }

    /// HTTP status reported by the server, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best human-readable message for a notification.
    ///
    /// Prefers the server-supplied message, then the transport error, then a
    /// generic string. Never empty.
    pub fn user_message(&self) -> String {
        let message = match self {
            ClientError::Server {
                message: Some(m), ..
            } => m.clone(),
            ClientError::Server { message: None, .. } => String::new(),
            ClientError::Transport { message } => message.clone(),
            ClientError::Validation(errors) => format_field_errors(errors),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Build a server error from a status and a (possibly non-JSON) body
    pub fn from_response(status: u16, body: &str) -> Self {
        ClientError::Server {
            status,
            message: extract_server_message(body),
        }
    }

    pub(crate) fn decode(resource: &str, err: impl fmt::Display) -> Self {
        ClientError::Decode {
            resource: resource.to_string(),
            message: err.to_string(),
        }
    }
}

/// Pull a message out of an error body: `message`, then `error`, then `detail`.
///
/// `error` may itself be an object carrying `message`. Plain-text bodies are
/// used as-is when short enough to show.
pub fn extract_server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["message", "error", "detail"].iter().find_map(|key| {
            match map.get(*key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Object(inner) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            }
        }),
        Ok(_) => None,
        Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ClientError::Server {
                status: status.as_u16(),
                message: None,
            };
        }
        let message = if err.is_timeout() {
            "The request timed out".to_string()
        } else if err.is_connect() {
            "Unable to reach the server".to_string()
        } else {
            err.to_string()
        };
        ClientError::Transport { message }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("invalid ({})", e.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ClientError::Validation(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let rejected = ClientError::Server {
            status: 422,
            message: None,
        };
        let failed = ClientError::Server {
            status: 503,
            message: None,
        };

        assert_eq!(rejected.kind(), ErrorKind::Rejected);
        assert_eq!(failed.kind(), ErrorKind::ServerFailure);
        assert_eq!(ClientError::Cancelled.kind(), ErrorKind::Cancelled);
        assert!(!ClientError::Cancelled.is_retryable());
        assert!(failed.is_retryable());
        assert_eq!(failed.status(), Some(503));
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ClientError::from_response(409, r#"{"message": "Email already in use"}"#);
        assert_eq!(err.user_message(), "Email already in use");
    }

    #[test]
    fn test_user_message_falls_back_to_transport() {
        let err = ClientError::Transport {
            message: "Unable to reach the server".to_string(),
        };
        assert_eq!(err.user_message(), "Unable to reach the server");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let err = ClientError::from_response(500, "");
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ClientError::Transport {
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_extract_server_message_variants() {
        assert_eq!(
            extract_server_message(r#"{"error": "Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(
            extract_server_message(r#"{"error": {"message": "bad token"}}"#).as_deref(),
            Some("bad token")
        );
        assert_eq!(
            extract_server_message(r#"{"detail": "Not found"}"#).as_deref(),
            Some("Not found")
        );
        assert_eq!(extract_server_message(r#"{"code": 7}"#), None);
        assert_eq!(
            extract_server_message("Bad Gateway").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(extract_server_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_display_formats() {
        let err = ClientError::Server {
            status: 404,
            message: Some("Lead not found".to_string()),
        };
        assert_eq!(err.to_string(), "Server responded with 404: Lead not found");

        let err = ClientError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "invalid email".to_string(),
        }]);
        assert_eq!(err.to_string(), "Validation failed: email: invalid email");
        assert_eq!(err.user_message(), "email: invalid email");
    }
}
