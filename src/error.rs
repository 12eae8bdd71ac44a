//! Error types for Career Guide.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Reference data (career catalog and question bank) errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read reference data from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse reference data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Stream {stream} missing from career catalog")]
    MissingStream { stream: String },

    #[error("Stream {stream} has no careers")]
    EmptyStream { stream: String },

    #[error("Duplicate question id: {id}")]
    DuplicateQuestion { id: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("LLM call timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("No LLM provider available")]
    NoProviders,
}

/// Errors raised while producing recommendations for a session.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("No stream confirmed for this session")]
    StreamNotConfirmed,

    #[error("No aligned careers available for stream {stream}")]
    NoAlignedCareers { stream: String },

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
