//! Platform error types

use thiserror::Error;

/// Host platform errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to bring up a host service (e.g. the tick thread)
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// The host does not provide the requested primitive
    #[error("Platform not available: {0}")]
    Unavailable(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
