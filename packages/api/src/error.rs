//! Failures talking to the hosted service, and their mapping onto [`store::Error`].

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        code: Option<String>,
    },
}

/// Union of the auth (`error_description`, `msg`) and data (`message`, `code`)
/// error bodies.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
}

impl ServiceError {
    /// Build from a response status and its raw body.
    pub fn rejected(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .error_description
            .or(parsed.msg)
            .or(parsed.message)
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        let code = match parsed.code {
            Some(serde_json::Value::String(code)) => Some(code),
            _ => parsed.error_code,
        };
        ServiceError::Rejected {
            status,
            message,
            code,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Rejected { status, .. } => Some(*status),
            ServiceError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn into_auth(self) -> store::Error {
        match self {
            ServiceError::Rejected { message, .. } => store::Error::Auth(message),
            ServiceError::Transport(e) => store::Error::Transport(e.to_string()),
        }
    }

    pub fn into_data(self) -> store::Error {
        match self {
            ServiceError::Rejected { message, code, .. } => store::Error::Data { message, code },
            ServiceError::Transport(e) => store::Error::Transport(e.to_string()),
        }
    }
}
