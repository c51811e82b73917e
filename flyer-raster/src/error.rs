//! Raster error types.

use thiserror::Error;

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that can occur while processing flyer imagery.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// A pixel buffer had inconsistent dimensions.
    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    /// Encoding a visualization failed.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}
