//! Domain error taxonomy.

use thiserror::Error;

use crate::checklist::SessionType;

/// Failures the QA core can report to its callers.
///
/// Every validation failure is raised before any write is issued; storage
/// failures propagate unretried in the `Storage` variant.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("Unknown session type: {0}")]
    InvalidSessionType(String),

    #[error("Checklist item {item_id} is not part of the {session_type} schedule")]
    UnknownChecklistItem {
        session_type: SessionType,
        item_id: String,
    },

    #[error("Unit {0} not found")]
    UnitNotFound(i64),

    #[error("Report {0} not found")]
    ReportNotFound(i64),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("A unit named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Username or email already in use")]
    DuplicateUser,

    #[error("Reference value must be non-zero")]
    InvalidReference,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
