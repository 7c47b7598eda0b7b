//! Client error types

use std::collections::HashMap;

use serde_json::Value;
use shared::ErrorCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (network, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401 from the server; the session must be re-established
    #[error("Authentication required: {message}")]
    Unauthorized { code: ErrorCode, message: String },

    /// 403 from the server
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Any other API error body
    #[error("API error {code}: {message}")]
    Api {
        code: ErrorCode,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the caller should drop its session and go back to login
    ///
    /// Wrong credentials on the login screen are not a session error.
    pub fn is_session_error(&self) -> bool {
        match self {
            ClientError::Unauthorized { code, .. } => *code != ErrorCode::InvalidCredentials,
            ClientError::Api { code, .. } => code.is_session_error(),
            _ => false,
        }
    }

    /// Error code carried by the server response, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Unauthorized { code, .. } | ClientError::Api { code, .. } => Some(*code),
            ClientError::Forbidden(_) => Some(ErrorCode::PermissionDenied),
            _ => None,
        }
    }

    /// Network-level failures the user can simply retry
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            ClientError::Api { code, .. } => {
                matches!(code, ErrorCode::NetworkError | ErrorCode::TimeoutError)
            }
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
