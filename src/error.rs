use std::io;
use thiserror::Error;

//===========================================================================//

/// Errors produced while building or parsing ICO files.
#[derive(Debug, Error)]
pub enum IcoError {
    /// The caller passed bad arguments (empty size list, zero or oversized
    /// dimension, a source image that can't be loaded).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The bytes are not a well-formed ICO file.
    #[error("invalid ICO data: {0}")]
    InvalidFormat(String),

    /// The PNG encoder failed to produce a payload.
    #[error("failed to encode PNG: {0}")]
    EncodingFailure(String),

    /// An embedded PNG or BMP payload could not be decoded.
    #[error("failed to decode image: {0}")]
    DecodingFailure(String),

    /// The ICO file holds no images at all.
    #[error("no images found in ICO file")]
    NoImages,

    /// Writing to the destination failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IcoError>;

//===========================================================================//
