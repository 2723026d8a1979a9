use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A lifecycle operation was attempted from a state that does not
    /// permit it. The current status is embedded so the caller can decide
    /// whether to re-fetch and retry.
    #[error("Cannot {action} {entity} with status {status}")]
    InvalidState {
        action: &'static str,
        entity: &'static str,
        status: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
