//! High-level image operations.
//!
//! These functions combine calculations with backend execution. The two
//! operations every file goes through are [`resize_to_width`] and [`save`].

use super::backend::{BackendError, ImageBackend};
use super::calculations::{fits_jpeg, plan_dimensions};
use super::params::{Quality, ResizeParams};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// A decoded source image and where it came from.
///
/// Owned for the duration of one file's processing and dropped afterwards.
#[derive(Debug)]
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
}

impl SourceImage {
    /// Decode `path` through the backend.
    pub fn open(backend: &impl ImageBackend, path: &Path) -> Result<Self> {
        let image = backend.load(path)?;
        Ok(Self::from_image(path, image))
    }

    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }
}

/// The raster produced by [`resize_to_width`], ready to be saved.
#[derive(Debug)]
pub struct OutputImage {
    image: DynamicImage,
    resampled: bool,
}

impl OutputImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    /// False when the policy kept the source pixels as they were.
    pub fn resampled(&self) -> bool {
        self.resampled
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }
}

/// Resize `source` to `params.target_width`, preserving aspect ratio.
///
/// Under [`ResizePolicy::OnlyIfWider`](super::ResizePolicy::OnlyIfWider) a
/// source that is not wider than the target is passed through untouched.
/// Otherwise the image is resampled with Lanczos3 to exactly
/// `(target_width, derive_height(..))`. Target sizes no JPEG can hold are
/// rejected before any pixels are allocated.
pub fn resize_to_width(source: SourceImage, params: ResizeParams) -> Result<OutputImage> {
    if params.target_width == 0 {
        return Err(BackendError::InvalidWidth);
    }

    match plan_dimensions(source.dimensions(), params) {
        None => {
            log::debug!(
                "{}: {}px wide, not above {}px, keeping original size",
                source.path.display(),
                source.width(),
                params.target_width
            );
            Ok(OutputImage {
                image: source.image,
                resampled: false,
            })
        }
        Some((width, height)) if !fits_jpeg((width, height)) => {
            Err(BackendError::TooLarge { width, height })
        }
        Some((width, height)) => {
            log::debug!(
                "{}: {}x{} -> {}x{}",
                source.path.display(),
                source.width(),
                source.height(),
                width,
                height
            );
            Ok(OutputImage {
                image: source.image.resize_exact(width, height, FilterType::Lanczos3),
                resampled: true,
            })
        }
    }
}

/// How a successful [`save`] got its pixels into the JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Encoded in the image's own pixel format.
    Direct,
    /// The first attempt was rejected; the image was converted to RGB8 and
    /// the second attempt succeeded.
    ConvertedToRgb,
}

/// A save that failed for good.
#[derive(Error, Debug)]
#[error("Failed to save {}: {source}", .path.display())]
pub struct EncodeError {
    pub path: PathBuf,
    pub source: BackendError,
}

/// Encode `image` as JPEG at `destination`.
///
/// If the encoder rejects the pixel format (alpha, 16-bit, float), the image
/// is converted to RGB8 and encoded exactly once more. Any other failure, or
/// a failure of the second attempt, is returned as an [`EncodeError`].
pub fn save(
    backend: &impl ImageBackend,
    image: &OutputImage,
    destination: &Path,
    quality: Quality,
) -> std::result::Result<SaveOutcome, EncodeError> {
    let fail = |source: BackendError| EncodeError {
        path: destination.to_path_buf(),
        source,
    };

    match backend.encode_jpeg(&image.image, destination, quality.as_u8()) {
        Ok(()) => Ok(SaveOutcome::Direct),
        Err(err) if err.is_format_incompatibility() => {
            log::debug!(
                "{}: {err}, converting to RGB and retrying",
                destination.display()
            );
            let rgb = DynamicImage::ImageRgb8(image.image.to_rgb8());
            backend
                .encode_jpeg(&rgb, destination, quality.as_u8())
                .map(|()| SaveOutcome::ConvertedToRgb)
                .map_err(fail)
        }
        Err(err) => Err(fail(err)),
    }
}
