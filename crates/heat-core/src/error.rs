use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeatError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Stock not found: {0}")]
    StockNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
