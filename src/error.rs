// src/error.rs

//! Unified error handling for the banner pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream answered, but never with 200 OK
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Request never produced a response (DNS, timeout, reset, ...)
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// 200 response whose body is not JSON at all (maintenance page, captcha)
    #[error("Undecodable body from {url}: {message}")]
    Decode { url: String, message: String },

    /// Upstream document is missing a field we depend on
    #[error("Data contract violated by {context}: {message}")]
    Contract { context: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a non-success status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Create a transport-level error from anything displayable.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an undecodable-body error.
    pub fn decode(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a data contract error with context.
    pub fn contract(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Contract {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this failure came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Transport { .. })
    }

    /// Whether this failure is an upstream data contract violation.
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract { .. })
    }

    /// HTTP status carried by a `Status` failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
