//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the three operations that touch the
//! filesystem: identify, load, and encode-to-JPEG. Resampling is pure pixel
//! work and lives in [`operations`](super::operations), so the backend is the
//! only seam a test needs to replace.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use image::{ColorType, DynamicImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("JPEG cannot store {0:?} pixels")]
    UnsupportedColor(ColorType),
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
    #[error("Target width must be greater than zero")]
    InvalidWidth,
    #[error("{width}x{height} is larger than JPEG allows")]
    TooLarge { width: u32, height: u32 },
}

impl BackendError {
    /// True when the encoder rejected the pixel layout rather than failing
    /// outright. This is the only failure the RGB fallback recovers from.
    pub fn is_format_incompatibility(&self) -> bool {
        matches!(self, BackendError::UnsupportedColor(_))
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image backends.
pub trait ImageBackend {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image from disk.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` as JPEG at `path`.
    ///
    /// Must return [`BackendError::UnsupportedColor`] for pixel layouts JPEG
    /// cannot hold, so callers can convert and retry.
    fn encode_jpeg(&self, image: &DynamicImage, path: &Path, quality: u8)
    -> Result<(), BackendError>;
}
