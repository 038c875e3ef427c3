//! # MediPredict Error Handling
//!
//! This crate provides the unified error type shared by MediPredict services.
//! It uses `thiserror` for the error definitions and converts cleanly into
//! `anyhow::Error` for binaries.
//!
//! ## Features
//!
//! - **Field-level validation**: [`ValidationErrors`] carries every problem
//!   found in a payload and renders as a `422 Unprocessable Entity` body
//! - **`axum`**: `IntoResponse` for [`MpError`]
//! - **`reqwest`**: `From<reqwest::Error>` for HTTP clients
//!
//! ## Usage
//!
//! ```rust
//! use mp_error::{MpError, Result};
//!
//! fn operation() -> Result<String> {
//!     Err(MpError::config("missing api prefix"))
//! }
//!
//! use anyhow::Context;
//!
//! fn app_code() -> anyhow::Result<()> {
//!     let _ = operation().context("failed to load settings");
//!     Ok(())
//! }
//! ```

mod validation;

pub use validation::{FieldError, ValidationErrors};

use thiserror::Error;

/// The main error type for MediPredict services.
#[derive(Error, Debug)]
pub enum MpError {
    /// Configuration errors (invalid values, unreadable files, etc.)
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors (binding sockets, creating log directories, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Logging and tracing setup errors
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network errors (connection failures, unexpected upstream status)
    #[error("network error: {0}")]
    Network(String),

    /// Timeout errors (operation deadlines exceeded)
    #[error("timeout: {0}")]
    Timeout(String),

    /// A single invalid input value outside of a request payload
    #[error("invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Request payload failed validation
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Request body was not sent as JSON
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Internal errors (bugs, unexpected states, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Type alias for Results using MpError
pub type Result<T> = std::result::Result<T, MpError>;

impl From<serde_json::Error> for MpError {
    fn from(err: serde_json::Error) -> Self {
        MpError::Serialization(err.to_string())
    }
}

impl From<ValidationErrors> for MpError {
    fn from(errors: ValidationErrors) -> Self {
        MpError::Validation(errors)
    }
}

impl From<FieldError> for MpError {
    fn from(error: FieldError) -> Self {
        MpError::Validation(error.into())
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for MpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MpError::Timeout(err.to_string())
        } else if err.is_connect() {
            MpError::Network(format!("connection error: {err}"))
        } else if err.is_decode() {
            MpError::Serialization(err.to_string())
        } else {
            MpError::Network(err.to_string())
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for MpError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let status = self.status_code();
        let error_type = self.error_type();

        let body = match &self {
            MpError::Validation(errors) => serde_json::json!({
                "error": error_type,
                "message": self.to_string(),
                "detail": errors,
            }),
            _ => serde_json::json!({
                "error": error_type,
                "message": self.to_string(),
            }),
        };

        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

impl MpError {
    /// HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            MpError::Validation(_) => 422,
            MpError::InvalidInput { .. } => 400,
            MpError::UnsupportedMediaType(_) => 415,
            MpError::Timeout(_) => 504,
            MpError::Network(_) => 502,
            MpError::Config(_)
            | MpError::Serialization(_)
            | MpError::Io(_)
            | MpError::Telemetry(_)
            | MpError::Internal(_) => 500,
        }
    }

    /// Short machine readable error kind used in response bodies.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            MpError::Validation(_) => "validation_error",
            MpError::InvalidInput { .. } => "invalid_input",
            MpError::Serialization(_) => "serialization_error",
            MpError::UnsupportedMediaType(_) => "unsupported_media_type",
            MpError::Timeout(_) => "timeout",
            MpError::Network(_) => "network_error",
            MpError::Config(_) => "config_error",
            MpError::Io(_) | MpError::Telemetry(_) | MpError::Internal(_) => "internal_error",
        }
    }

    /// Determines if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, MpError::Network(_) | MpError::Timeout(_))
    }

    /// Determines if this error is a client error (4xx-equivalent).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Field errors carried by a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            MpError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    // ==========================================
    // Convenience constructors
    // ==========================================

    /// Creates an invalid input error
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MpError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        MpError::Config(msg.into())
    }

    /// Creates a network error
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        MpError::Network(msg.into())
    }

    /// Creates a timeout error
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        MpError::Timeout(msg.into())
    }

    /// Creates a telemetry error
    #[must_use]
    pub fn telemetry(msg: impl Into<String>) -> Self {
        MpError::Telemetry(msg.into())
    }

    /// Creates an internal error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        MpError::Internal(msg.into())
    }
}
