//! Error types for the core services.

use verdant_catalog::CatalogError;
use verdant_cultivation::RecipeError;
use verdant_domain::IllegalTransition;
use verdant_store::StoreError;

/// Core service failure kinds.
///
/// Service-local failures use the plain kinds; failures raised by the
/// catalog or cultivation layers pass through wrapped, so callers can still
/// see which layer refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
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

    /// A multi-step operation failed partway and was rolled back.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// A request status move that the status machine forbids.
    #[error(transparent)]
    Transition(#[from] IllegalTransition),

    /// A catalog lookup behind the operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A cultivation plan operation behind the operation failed.
    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

impl From<StoreError> for CoreError {
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
