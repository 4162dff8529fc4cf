use crate::types::DbId;

/// Domain-level error taxonomy shared by every crate in the workspace.
///
/// Components raise the most specific kind; the HTTP layer maps kinds to
/// status codes. Messages in `Internal` and `External` are for logs and are
/// never forwarded to clients verbatim.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Not-found for records without a numeric id (OTP records, emails).
    #[error("Not found: {0}")]
    NotFoundMsg(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A collaborating service (cache, mail, media store) failed.
    #[error("External service error: {0}")]
    External(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
