use crate::types::DbId;

/// Domain-level errors raised by the services and handlers.
///
/// Authentication problems never appear here: a request without a valid
/// session is simply anonymous, and the action it attempts is then rejected
/// with [`CoreError::Forbidden`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
