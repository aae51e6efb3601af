//! Error type shared by the HTTP helpers and the auth orchestrator. HTTP
//! failures carry the server-supplied message when one could be extracted so
//! the orchestrator can surface a single human-readable line.

use std::fmt;

/// Maximum number of characters of a server-supplied message surfaced to the UI.
const MAX_MESSAGE_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http {
        status: u16,
        message: Option<String>,
    },
    Parse(String),
    Serialization(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http {
                status,
                message: Some(message),
            } => write!(formatter, "Request failed ({status}): {message}"),
            AppError::Http {
                status,
                message: None,
            } => write!(formatter, "Request failed ({status})"),
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Extracts a user-facing message from an HTTP error body.
///
/// Preference order: a JSON `message` field, then a JSON string body, then the
/// raw body text. Returns `None` for empty bodies and for JSON objects without
/// a usable `message`, so callers fall back to a per-action default.
pub fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(message) = value.get("message").and_then(|field| field.as_str()) {
            return normalize_message(message);
        }
        if let Some(message) = value.as_str() {
            return normalize_message(message);
        }
        return None;
    }

    normalize_message(trimmed)
}

fn normalize_message(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_MESSAGE_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, server_message};

    #[test]
    fn server_message_prefers_json_message_field() {
        assert_eq!(
            server_message(r#"{"status":false,"message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
    }

    #[test]
    fn server_message_accepts_plain_string_bodies() {
        assert_eq!(
            server_message("account locked"),
            Some("account locked".to_string())
        );
        assert_eq!(
            server_message(r#""account locked""#),
            Some("account locked".to_string())
        );
    }

    #[test]
    fn server_message_rejects_empty_and_messageless_bodies() {
        assert_eq!(server_message(""), None);
        assert_eq!(server_message("   "), None);
        assert_eq!(server_message(r#"{"status":false}"#), None);
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn server_message_truncates_oversized_bodies() {
        let body = "x".repeat(400);
        let message = server_message(&body).expect("non-empty body");
        assert_eq!(message.len(), 200);
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = AppError::Http {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "Request failed (401): Invalid credentials");

        let bare = AppError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(bare.to_string(), "Request failed (500)");
    }
}
