use thiserror::Error;

/// Error type for server startup and runtime faults.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or I/O failure while binding or serving.
    #[error("Input/output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
