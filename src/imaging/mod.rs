//! Image processing on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** | `ImageReader` with format sniffing |
//! | **Resize** | `resize_exact` with `Lanczos3` |
//! | **Save → JPEG** | `JpegEncoder`, one RGB fallback on incompatible pixels |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{MAX_JPEG_DIMENSION, derive_height, fits_jpeg, plan_dimensions};
pub use operations::{
    EncodeError, OutputImage, SaveOutcome, SourceImage, get_dimensions, resize_to_width, save,
};
pub use params::{Quality, ResizeParams, ResizePolicy};
pub use rust_backend::RustBackend;
