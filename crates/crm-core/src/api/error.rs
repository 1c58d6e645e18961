use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::auth::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated - please log in")]
    Unauthenticated,

    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        /// Message supplied by the server, if one could be extracted from the body
        message: Option<String>,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull a human-readable message out of an error body.
    ///
    /// The gateway reports failures as `{"detail": "..."}`; some proxies answer
    /// with a bare JSON string or plain text instead.
    fn extract_message(body: &str) -> Option<String> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => ["detail", "message", "error"]
                .iter()
                .find_map(|key| match map.get(*key) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                }),
            Ok(Value::String(s)) => Some(s),
            Ok(_) => None,
            Err(_) => Some(Self::truncate_body(trimmed)),
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            message: Self::extract_message(body),
            body: Self::truncate_body(body),
        }
    }

    /// HTTP status of a server-side failure, `None` for local and transport errors
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// True when the server rejected the credential (401/403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message_is_extracted() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail":"Клиент не найден"}"#);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.server_message(), Some("Клиент не найден"));
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_plain_text_and_json_string_bodies() {
        let plain = ApiError::from_status(StatusCode::NOT_FOUND, "Клиент не найден");
        assert_eq!(plain.server_message(), Some("Клиент не найден"));

        let quoted = ApiError::from_status(StatusCode::BAD_REQUEST, r#""bad input""#);
        assert_eq!(quoted.server_message(), Some("bad input"));

        let empty = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "   ");
        assert_eq!(empty.server_message(), None);
        assert_eq!(empty.to_string(), "Server returned 500 Internal Server Error: no details");
    }

    #[test]
    fn test_unauthorized_statuses() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(ApiError::from_status(StatusCode::FORBIDDEN, "").is_unauthorized());
        assert!(ApiError::Unauthenticated.status().is_none());
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "я".repeat(400);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated, 800 total bytes"));
    }
}
