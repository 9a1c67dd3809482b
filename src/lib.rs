//! # batch-resize
//!
//! Resize every image in one directory to a fixed width, keeping the aspect
//! ratio, and save the results as JPEG.
//!
//! # Pipeline
//!
//! Each file goes through the same steps, one file at a time:
//!
//! ```text
//! scan      dir/       →  selected paths     (non-recursive, sorted)
//! decode    path       →  SourceImage
//! resize    source     →  OutputImage        (Lanczos3, width-driven)
//! save      output     →  <prefix><stem>.jpg (RGB fallback on format rejection)
//! ```
//!
//! A file that fails at any step is recorded in the [`process::BatchSummary`]
//! and the batch continues.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists the source directory and applies the selection rule |
//! | [`naming`] | Derives `<prefix><stem>.jpg` output paths |
//! | [`imaging`] | Dimension math, resampling, JPEG encoding with fallback |
//! | [`config`] | Presets, `resize.toml` loading, merging, and validation |
//! | [`process`] | Sequential batch driver and per-file outcomes |
//! | [`output`] | CLI output formatting |
//!
//! # Presets
//!
//! | Preset | Width | Selection | Output name |
//! |--------|-------|-----------|-------------|
//! | `blog` | 1400 | every file | `photo.png` → `photo.jpg` |
//! | `thumbnail` | 720 | `.jpg` / `.jpeg` | `photo.jpg` → `3_photo.jpg` |
//!
//! Both only shrink by default. Height is `round(h * width / w)`, never less
//! than 1.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
