use thiserror::Error;

/// Errors produced while interpreting TAXII payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown status value: {0}")]
    InvalidStatus(String),

    #[error("malformed bundle: {0}")]
    MalformedBundle(String),
}
