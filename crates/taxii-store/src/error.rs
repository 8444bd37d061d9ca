/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage engine could not be reached or refused the operation.
    /// Callers may retry; the store itself never does.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A namespace was addressed that has not been provisioned.
    #[error("namespace not provisioned: {0}")]
    UnknownNamespace(String),
}

impl StoreError {
    /// Whether the caller may reasonably retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
