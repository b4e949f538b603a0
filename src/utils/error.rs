use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotateError {
    #[error("Catalog API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Database operation failed: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Catalog authentication failed: {message}")]
    AuthError { message: String },

    #[error("Catalog request returned status {status}: {message}")]
    CatalogError { status: u16, message: String },

    #[error("Operation timed out: {operation}")]
    TimeoutError { operation: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, RotateError>;
