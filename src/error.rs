use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("Query rejected: {0}")]
    RejectedQuery(String),

    #[error("{0}")]
    QueryExecution(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

impl Error {
    pub(crate) fn account_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            kind: "Account",
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }
}

/// Engine failures that mean the database itself is unusable map to
/// `Connection`; everything else is a per-query failure.
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(
                    e.code,
                    ErrorCode::CannotOpen
                        | ErrorCode::NotADatabase
                        | ErrorCode::PermissionDenied
                        | ErrorCode::AuthorizationForStatementDenied
                        | ErrorCode::DatabaseCorrupt
                        | ErrorCode::SystemIoFailure
                ) =>
            {
                Self::Connection(err.to_string())
            }
            _ => Self::QueryExecution(err.to_string()),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
