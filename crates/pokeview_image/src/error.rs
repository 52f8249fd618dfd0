//! Image error types

use thiserror::Error;

/// Image loading errors
#[derive(Error, Debug)]
pub enum ImageError {
    /// Failed to fetch the image
    #[error("Network error: {0}")]
    Network(String),

    /// Failed to decode the image bytes
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<image::ImageError> for ImageError {
    fn from(e: image::ImageError) -> Self {
        ImageError::Decode(e.to_string())
    }
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
