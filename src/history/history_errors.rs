use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for portfolio history operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for HistoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => HistoryError::NotFound("Record not found".to_string()),
            _ => HistoryError::DatabaseError(err.to_string()),
        }
    }
}

impl From<crate::errors::Error> for HistoryError {
    fn from(err: crate::errors::Error) -> Self {
        HistoryError::DatabaseError(err.to_string())
    }
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;
