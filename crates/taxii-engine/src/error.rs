use thiserror::Error;

/// Errors surfaced by the core engine.
///
/// Expected absences (unknown root, unknown collection, empty bundle,
/// exhausted status record) are not errors; they come back as `bool`,
/// `Option`, or outcome enums.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A pagination parameter was not a positive integer.
    #[error("invalid value for `{name}`: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("store error: {0}")]
    Store(#[from] taxii_store::StoreError),
}

impl EngineError {
    /// Whether the failure came from an unavailable storage engine and the
    /// caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
