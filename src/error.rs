// Client error types
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Message shown when a failed request carries nothing more useful
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures talking to the remote API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not be completed (connection refused, DNS, TLS, ...)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server responded with {status}")]
    Status { status: StatusCode, body: String },

    /// Success status but the body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        ClientError::Status {
            status,
            body: body.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ClientError::MalformedResponse(message.into())
    }

    /// HTTP status code, when the server answered at all
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Message supplied by the server in a failure body.
    ///
    /// A body that is exactly a string (JSON string or bare text) is used as-is;
    /// a JSON object contributes its `message` field. Anything else yields `None`.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ClientError::Status { body, .. } => message_from_body(body),
            _ => None,
        }
    }

    /// Single human-readable message for the UI
    pub fn user_message(&self) -> String {
        self.server_message()
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
    }
}

fn message_from_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => non_empty(s),
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(s)) => non_empty(s.clone()),
            _ => None,
        },
        // Other JSON (arrays, numbers, null) carries no message
        Ok(_) => None,
        // Plain text body
        Err(_) => non_empty(trimmed.to_string()),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
