use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for holding and position ledger operations
#[derive(Debug, Error)]
pub enum HoldingError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for HoldingError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => HoldingError::NotFound("Record not found".to_string()),
            _ => HoldingError::DatabaseError(err.to_string()),
        }
    }
}

impl From<crate::errors::Error> for HoldingError {
    fn from(err: crate::errors::Error) -> Self {
        HoldingError::DatabaseError(err.to_string())
    }
}

/// Result type for holding operations
pub type Result<T> = std::result::Result<T, HoldingError>;
