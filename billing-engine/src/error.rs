use rust_decimal::Decimal;
use thiserror::Error;

/// Engine failure kinds.
///
/// Each variant maps to exactly one transport-level outcome at the boundary,
/// so callers can translate deterministically instead of parsing messages.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Insufficient stock for {product}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    #[error("Credit limit exceeded. Available: {available}")]
    CreditLimitExceeded { available: Decimal },

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Store error: {0}")]
    Store(anyhow::Error),
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(err: validator::ValidationErrors) -> Self {
        EngineError::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Config(anyhow::Error::new(err))
    }
}

impl EngineError {
    /// Stable tag for metrics labels and transport-code mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::NotFound(_) => "not_found",
            EngineError::InsufficientStock { .. } => "insufficient_stock",
            EngineError::CreditLimitExceeded { .. } => "credit_limit_exceeded",
            EngineError::Unauthorized(_) => "unauthorized",
            EngineError::Conflict(_) => "conflict",
            EngineError::Config(_) => "config",
            EngineError::Store(_) => "store",
        }
    }
}
