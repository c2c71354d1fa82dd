use thiserror::Error;

/// Custom error type for price oracle and master data operations
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Symbol not found: {0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Malformed payload: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MarketDataError::ParseError(err.to_string())
        } else {
            MarketDataError::NetworkError(err.to_string())
        }
    }
}

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;
