//! Output filename derivation.
//!
//! Every output is named `<prefix><stem>.jpg`, where the stem is the source
//! file name minus its final extension:
//!
//! - prefix `""`: `photo.png` → `photo.jpg`, `photo.jpg` → `photo.jpg` (overwrites)
//! - prefix `"3_"`: `photo.jpg` → `3_photo.jpg`
//! - `c.JPG.bak` → `c.JPG.jpg` (only the last extension is dropped)
//!
//! Outputs go next to the source unless an output directory is set.

use std::path::{Path, PathBuf};

/// Extension every output file gets.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// How output paths are derived from source paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputNaming {
    /// Literal text prepended to the stem. Empty means "same name, `.jpg`".
    pub prefix: String,
    /// Directory for outputs. `None` writes next to each source file.
    pub directory: Option<PathBuf>,
}

impl OutputNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            directory: None,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Output file name for a source file name.
    pub fn file_name(&self, source_name: &str) -> String {
        format!("{}{}.{}", self.prefix, stem(source_name), OUTPUT_EXTENSION)
    }

    /// Full output path for a source path.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = match &self.directory {
            Some(dir) => dir.as_path(),
            None => source.parent().unwrap_or_else(|| Path::new("")),
        };
        dir.join(self.file_name(&name))
    }
}

/// File name minus its final extension. Names without a dot are returned whole.
fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_forces_jpg_extension() {
        let naming = OutputNaming::default();
        assert_eq!(naming.file_name("diagram.png"), "diagram.jpg");
        assert_eq!(naming.file_name("scan.tiff"), "scan.jpg");
    }

    #[test]
    fn empty_prefix_on_jpg_keeps_name() {
        assert_eq!(OutputNaming::default().file_name("a.jpg"), "a.jpg");
    }

    #[test]
    fn jpeg_extension_normalized() {
        assert_eq!(OutputNaming::default().file_name("photo.jpeg"), "photo.jpg");
    }

    #[test]
    fn prefix_prepended_to_stem() {
        let naming = OutputNaming::new("3_");
        assert_eq!(naming.file_name("beach.jpg"), "3_beach.jpg");
    }

    #[test]
    fn only_last_extension_dropped() {
        let naming = OutputNaming::new("3_");
        assert_eq!(naming.file_name("c.JPG.bak"), "3_c.JPG.jpg");
    }

    #[test]
    fn name_without_extension() {
        assert_eq!(OutputNaming::default().file_name("README"), "README.jpg");
    }

    #[test]
    fn output_path_next_to_source() {
        let naming = OutputNaming::new("3_");
        assert_eq!(
            naming.output_path(Path::new("/photos/trip/a.jpg")),
            PathBuf::from("/photos/trip/3_a.jpg")
        );
    }

    #[test]
    fn output_path_in_output_directory() {
        let naming = OutputNaming::default().with_directory("/out");
        assert_eq!(
            naming.output_path(Path::new("/photos/trip/b.png")),
            PathBuf::from("/out/b.jpg")
        );
    }

    #[test]
    fn output_path_relative_source() {
        let naming = OutputNaming::default();
        assert_eq!(
            naming.output_path(Path::new("a.png")),
            PathBuf::from("a.jpg")
        );
    }
}
