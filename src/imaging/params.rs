//! Parameter types for image operations.
//!
//! These describe *what* to do, not *how*. The [`operations`](super::operations)
//! module turns them into pixel work and backend calls.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`ResizePolicy`]: Whether narrow sources are left alone or always resampled.
//! - [`ResizeParams`]: Target width plus policy for a single resize.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Quality as the `u8` the JPEG encoder expects.
    pub fn as_u8(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// When to resample a source image.
///
/// - `OnlyIfWider`: sources at or below the target width keep their original
///   dimensions. This is what both presets use.
/// - `Always`: every source is resampled to the target width, upscaling narrow
///   images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizePolicy {
    Always,
    #[default]
    OnlyIfWider,
}

/// Parameters for a width-driven resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub target_width: u32,
    pub policy: ResizePolicy,
}
