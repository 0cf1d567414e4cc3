//! Crate error type.
//!
//! Malformed schema text is never an error here; it surfaces as diagnostics.
//! These variants cover host-supplied configuration and output encoding.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Unknown routing style: {0} (expected straight, curved or orthogonal)")]
    UnknownRoutingStyle(String),
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Scale must be a positive finite number, got {0}")]
    InvalidScale(f64),
    #[error("Failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to render SVG: {0}")]
    Render(#[from] std::fmt::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
