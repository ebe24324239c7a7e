/// Errors raised while bringing a storage backend up
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver-level MongoDB failure
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The server could not be reached, even after retrying
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection settings were rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
