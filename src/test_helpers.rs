//! Shared test utilities for the batch-resize test suite.
//!
//! Provides synthetic image writers, a scratch-directory builder, and
//! lookups over batch results.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_dir(&[("a.jpg", Fixture::Jpeg(2000, 1000)), ("notes.txt", Fixture::Text)]);
//! let summary = process(tmp.path(), &ResizeConfig::default(), None).unwrap();
//!
//! let report = find_report(&summary, "a.jpg");
//! assert_jpeg_dimensions(&tmp.path().join("a.jpg"), (1400, 700));
//! ```

use image::{DynamicImage, ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

use crate::process::{BatchSummary, FileReport};

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a small valid RGB JPEG with a gradient so resampling has real work.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a PNG with a varying alpha channel.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, 64, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgba8(img)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Kinds of entries [`setup_dir`] can create.
#[derive(Debug, Clone, Copy)]
pub enum Fixture {
    Jpeg(u32, u32),
    PngRgba(u32, u32),
    Text,
    Dir,
}

// =========================================================================
// Directory setup
// =========================================================================

/// Create a temp directory populated with the named fixtures.
pub fn setup_dir(entries: &[(&str, Fixture)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, fixture) in entries {
        let path = tmp.path().join(name);
        match *fixture {
            Fixture::Jpeg(w, h) => create_test_jpeg(&path, w, h),
            Fixture::PngRgba(w, h) => create_test_png_rgba(&path, w, h),
            Fixture::Text => std::fs::write(&path, b"not an image").unwrap(),
            Fixture::Dir => std::fs::create_dir_all(&path).unwrap(),
        }
    }
    tmp
}

/// File names in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =========================================================================
// Result lookups (panic with a clear message on miss)
// =========================================================================

/// Find the report for a source file name. Panics if not found.
pub fn find_report<'a>(summary: &'a BatchSummary, file_name: &str) -> &'a FileReport {
    summary
        .reports
        .iter()
        .find(|r| r.source.file_name().is_some_and(|n| n == file_name))
        .unwrap_or_else(|| {
            let names: Vec<String> = summary
                .reports
                .iter()
                .map(|r| r.source.display().to_string())
                .collect();
            panic!("no report for '{file_name}'. Available: {names:?}")
        })
}

/// Assert a file on disk is a JPEG of the given size without alpha.
pub fn assert_jpeg_dimensions(path: &Path, expected: (u32, u32)) {
    let reader = image::ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    assert_eq!(
        reader.format(),
        Some(image::ImageFormat::Jpeg),
        "{} is not a JPEG",
        path.display()
    );
    let img = reader.decode().unwrap();
    assert_eq!(
        (img.width(), img.height()),
        expected,
        "dimensions of {}",
        path.display()
    );
    assert!(
        !img.color().has_alpha(),
        "{} decoded with alpha",
        path.display()
    );
}
