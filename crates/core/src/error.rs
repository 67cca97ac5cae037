use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A delete was blocked because other records still reference the
    /// entity. Surfaced to callers verbatim, never retried.
    #[error("Cannot delete {entity} with id {id}: {dependents} dependent record(s)")]
    HasDependents {
        entity: &'static str,
        id: DbId,
        dependents: i64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
