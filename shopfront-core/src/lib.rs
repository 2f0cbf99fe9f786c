pub mod comment;
pub mod favorite;
pub mod identity;
pub mod listing;
pub mod repository;

use shopfront_catalog::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationError(Vec<String>),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("Conflict: {0}")]
    ConflictError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        CoreError::InternalError(err.to_string())
    }
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(messages) => CoreError::ValidationError(messages),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_validation_keeps_messages() {
        let err: CoreError =
            CatalogError::Validation(vec!["price must be at least 0".to_string()]).into();
        match err {
            CoreError::ValidationError(messages) => assert_eq!(messages.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_internal_message() {
        let err = CoreError::internal("pool timed out");
        assert_eq!(err.to_string(), "Internal service error: pool timed out");
    }
}
