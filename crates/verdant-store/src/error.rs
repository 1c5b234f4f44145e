//! Store error types.

/// Errors raised by collection operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No live document under the given id.
    #[error("document not found")]
    NotFound,

    /// Insert collided with an existing document id.
    #[error("document already exists")]
    AlreadyExists,

    /// Optimistic concurrency check failed: the document changed since it
    /// was read.
    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// The version the writer read.
        expected: u64,
        /// The version currently stored.
        actual: u64,
    },
}
