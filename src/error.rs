//! Error types for fx-gameplan

use thiserror::Error;

/// Main error type for fx-gameplan
#[derive(Error, Debug)]
pub enum GamePlanError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Exchange rates unavailable: {0}")]
    RateUnavailable(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Plan has no entries")]
    EmptyPlan,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for fx-gameplan operations
pub type Result<T> = std::result::Result<T, GamePlanError>;
