//! Error types for the JSON:API demo
//!
//! This module defines the error hierarchy shared by the server, the
//! resource stores and the edit client. All public APIs return
//! `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Resource Errors
    // ============================================================================
    #[error("Resource '{kind}' with id '{id}' not found")]
    NotFound { kind: String, id: String },

    #[error("Invalid value '{value}' for query parameter '{param}'")]
    InvalidPageParam { param: String, value: String },

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("Resource conflict: {message}")]
    Conflict { message: String },

    // ============================================================================
    // Edit Lifecycle Errors
    // ============================================================================
    #[error("Cannot {action} while {phase}")]
    InvalidTransition { action: String, phase: String },

    #[error("A save is already in flight")]
    SaveInFlight,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an invalid page parameter error
    pub fn invalid_page_param(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidPageParam {
            param: param.into(),
            value: value.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(action: impl Into<String>, phase: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            phase: phase.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// HTTP status code a server should answer with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidPageParam { .. } | Error::InvalidDocument { .. } | Error::JsonParse(_) => {
                400
            }
            Error::NotFound { .. } => 404,
            Error::Conflict { .. } => 409,
            Error::HttpStatus { status, .. } => *status,
            _ => 500,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
