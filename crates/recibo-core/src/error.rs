//! Error types for the recibo-core library.
//!
//! Field-level misses never show up here: extractors return `Option` and the
//! assembler fills defaults. These variants cover what a caller must act on.

use thiserror::Error;

/// Main error type for the recibo library.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// The upstream extraction payload could not be routed to a pipeline.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// A mapped record is not fit for loading.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while recognizing the shape of an upstream response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// None of the known response shapes matched.
    #[error("unrecognized upstream format ({kind}): {preview}")]
    UnrecognizedFormat {
        /// JSON kind of the top-level value (`object`, `array`, ...).
        kind: &'static str,
        /// Bounded excerpt of the payload for diagnostics.
        preview: String,
    },

    /// A text-shaped payload carried no text.
    #[error("upstream {shape} payload contains no text")]
    EmptyText {
        /// Name of the matched shape.
        shape: &'static str,
    },
}

/// Errors related to record validation before loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Field has a value the target table rejects.
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
