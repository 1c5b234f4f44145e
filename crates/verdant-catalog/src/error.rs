//! Error types for the catalog services.

use verdant_store::StoreError;

/// Catalog failure kinds.
///
/// Authorization failures get their own variant instead of riding on
/// `InvalidInput`, so callers can tell "malformed request" from "not
/// allowed".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Missing or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced entity is absent or tombstoned.
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting party does not own the target entity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness or optimistic-concurrency conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A downstream write found nothing to update.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("document not found".to_string()),
            StoreError::AlreadyExists => Self::Conflict("document already exists".to_string()),
            StoreError::VersionConflict { expected, actual } => Self::Conflict(format!(
                "version conflict: expected {expected}, found {actual}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_kinds() {
        assert!(matches!(
            CatalogError::from(StoreError::NotFound),
            CatalogError::NotFound(_)
        ));
        assert!(matches!(
            CatalogError::from(StoreError::VersionConflict {
                expected: 1,
                actual: 2
            }),
            CatalogError::Conflict(_)
        ));
    }
}
