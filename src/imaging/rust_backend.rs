//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` with content sniffing |
//! | Decode (JPEG, PNG, TIFF, WebP) | `ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! Identify and decode both sniff the file contents instead of trusting the
//! extension, so names like `c.jpg.bak` still decode when a selection rule lets
//! them through.
//!
//! Encoding writes to a temporary file beside the destination and renames it
//! into place only after the encoder succeeds. An in-place run that fails
//! halfway leaves the source untouched.

use super::backend::{BackendError, Dimensions, ImageBackend};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageError, ImageReader};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Pixel layouts the JPEG encoder accepts as-is.
fn jpeg_compatible(color: ColorType) -> bool {
    matches!(color, ColorType::L8 | ColorType::Rgb8)
}

/// Backend using the `image` crate for decode and encode.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| decode_error(path, e))
    }

    fn encode_jpeg(
        &self,
        image: &DynamicImage,
        path: &Path,
        quality: u8,
    ) -> Result<(), BackendError> {
        // JPEG stores 8-bit gray or RGB only
        if !jpeg_compatible(image.color()) {
            return Err(BackendError::UnsupportedColor(image.color()));
        }

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        {
            let mut writer = std::io::BufWriter::new(staged.as_file_mut());
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            image.write_with_encoder(encoder).map_err(|e| match e {
                ImageError::Unsupported(_) => BackendError::UnsupportedColor(image.color()),
                ImageError::IoError(io) => BackendError::Io(io),
                other => BackendError::Encode {
                    path: path.to_path_buf(),
                    message: other.to_string(),
                },
            })?;
            writer.flush()?;
        }
        if let Some(permissions) = output_permissions(path)? {
            staged.as_file().set_permissions(permissions)?;
        }
        staged.persist(path).map_err(|e| BackendError::Io(e.error))?;
        Ok(())
    }
}

/// Mode for the finished file: that of the file being replaced, otherwise
/// the usual 0644. The staged temp file starts out owner-only.
fn output_permissions(path: &Path) -> std::io::Result<Option<std::fs::Permissions>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}

fn decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}
