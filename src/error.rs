//! Gateway error taxonomy.
//!
//! Three kinds, matched structurally by callers:
//!
//! - [`GatewayError::Validation`] — bad input, detected before any I/O.
//! - [`GatewayError::NotFound`] — no document at the given identifier; a
//!   normal outcome for fetch and delete, reported distinctly.
//! - [`GatewayError::Backend`] — the engine is unreachable, returned a
//!   non-success status, or produced a response we could not interpret.
//!   Carries the engine's own message for diagnostics.
//!
//! No retries happen anywhere in the core; every failure surfaces
//! immediately and retry policy belongs to callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("engine error: {0}")]
    Backend(String),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        GatewayError::NotFound(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        GatewayError::Backend(message.into())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Backend(format!("malformed engine response: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
