//! Error types for the cultivation plan service.

use verdant_catalog::CatalogError;
use verdant_store::StoreError;

/// Cultivation plan failure kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    /// Missing or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced plan is absent or tombstoned.
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting party does not own the target plan.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness or optimistic-concurrency conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A catalog lookup behind the operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<StoreError> for RecipeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("plan not found".to_string()),
            StoreError::AlreadyExists => Self::Conflict("plan already exists".to_string()),
            StoreError::VersionConflict { expected, actual } => Self::Conflict(format!(
                "version conflict: expected {expected}, found {actual}"
            )),
        }
    }
}
