//! Run configuration.
//!
//! A run is described by a [`ResizeConfig`]. Values come from three layers,
//! each overriding the one before:
//!
//! 1. A [`Preset`] (`blog` by default)
//! 2. An optional `resize.toml` in the source directory
//! 3. Command-line flags
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - blog preset defaults shown below
//!
//! target_width = 1400          # Output width in pixels
//! policy = "only-if-wider"     # or "always" (upscales narrow images)
//! quality = 90                 # JPEG quality (1-100)
//!
//! [select]
//! rule = "all"                 # "extension" | "substring" | "all"
//! # extensions = ["jpg", "jpeg"]   (rule = "extension")
//! # pattern = ".jpg"               (rule = "substring")
//! # case_sensitive = false
//!
//! [output]
//! prefix = ""                  # "3_" turns a.jpg into 3_a.jpg
//! # directory = "resized"      # default: next to each source
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown
//! top-level and `[output]` keys are rejected to catch typos early.

use crate::imaging::{MAX_JPEG_DIMENSION, Quality, ResizeParams, ResizePolicy};
use crate::naming::OutputNaming;
use crate::scan::Selection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file inside the source directory.
pub const CONFIG_FILENAME: &str = "resize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Named starting points matching the two classic workflows.
///
/// | Preset | width | selection | output |
/// |---|---|---|---|
/// | `blog` | 1400 | every file | `<stem>.jpg` beside the source |
/// | `thumbnail` | 720 | `.jpg` / `.jpeg` | `3_<stem>.jpg` beside the source |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    #[default]
    Blog,
    Thumbnail,
}

impl Preset {
    pub fn config(self) -> ResizeConfig {
        match self {
            Preset::Blog => ResizeConfig::default(),
            Preset::Thumbnail => ResizeConfig {
                target_width: 720,
                select: Selection::jpeg_files(),
                output: OutputConfig {
                    prefix: "3_".to_string(),
                    directory: None,
                },
                ..ResizeConfig::default()
            },
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Output width in pixels.
    pub target_width: u32,
    /// Whether narrow sources are resampled.
    pub policy: ResizePolicy,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Which files in the source directory are processed.
    pub select: Selection,
    /// Where and under what name outputs are written.
    pub output: OutputConfig,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            target_width: 1400,
            policy: ResizePolicy::OnlyIfWider,
            quality: 90,
            select: Selection::All,
            output: OutputConfig::default(),
        }
    }
}

/// Output naming settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Text prepended to every output stem.
    pub prefix: String,
    /// Output directory. Relative paths resolve against the source directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_width == 0 {
            return Err(ConfigError::Validation(
                "target_width must be greater than zero".into(),
            ));
        }
        if self.target_width > MAX_JPEG_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "target_width must be at most {MAX_JPEG_DIMENSION}"
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        match &self.select {
            Selection::Extension { extensions, .. } => {
                if extensions.is_empty() {
                    return Err(ConfigError::Validation(
                        "select.extensions must not be empty".into(),
                    ));
                }
                if extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
                    return Err(ConfigError::Validation(
                        "select.extensions must not contain empty entries".into(),
                    ));
                }
            }
            Selection::Substring { pattern, .. } => {
                if pattern.is_empty() {
                    return Err(ConfigError::Validation(
                        "select.pattern must not be empty".into(),
                    ));
                }
            }
            Selection::All => {}
        }
        Ok(())
    }

    pub fn resize_params(&self) -> ResizeParams {
        ResizeParams {
            target_width: self.target_width,
            policy: self.policy,
        }
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    /// Output naming, with a relative output directory resolved against `source_dir`.
    pub fn naming(&self, source_dir: &Path) -> OutputNaming {
        let naming = OutputNaming::new(self.output.prefix.clone());
        match &self.output.directory {
            Some(dir) => naming.with_directory(source_dir.join(dir)),
            None => naming,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns a preset's config as a `toml::Value::Table`, the base layer for
/// merging user overrides on top.
pub fn preset_value(preset: Preset) -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(preset.config())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
///
/// `select` is the exception: switching `rule` replaces the whole table, so
/// keys belonging to the previous rule don't leak into the new one.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) if key == "select" && changes_rule(&base_val, &overlay_val) => {
                        overlay_val
                    }
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

fn changes_rule(base: &toml::Value, overlay: &toml::Value) -> bool {
    match overlay.get("rule") {
        Some(rule) => base.get("rule") != Some(rule),
        None => false,
    }
}

/// Load `resize.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no config file exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a source directory: preset defaults overlaid with
/// `resize.toml` if present.
pub fn load_config(source_dir: &Path, preset: Preset) -> Result<ResizeConfig, ConfigError> {
    let base = preset_value(preset)?;
    let overlay = load_raw_config(source_dir)?;
    if overlay.is_some() {
        log::debug!(
            "applying {}",
            source_dir.join(CONFIG_FILENAME).display()
        );
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `resize.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# batch-resize configuration
# ==========================
# Place this file as resize.toml in the directory you resize.
# All settings are optional. Values shown below are the blog preset defaults;
# `--preset thumbnail` starts from width 720, .jpg files only, prefix "3_".
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Output width in pixels. Height follows the source aspect ratio,
# rounded to the nearest pixel.
target_width = 1400

# "only-if-wider": images at or below target_width keep their size.
# "always": every image is resampled to target_width (may upscale).
policy = "only-if-wider"

# JPEG encoding quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Which files to process (the directory is never searched recursively;
# hidden files are always skipped)
# ---------------------------------------------------------------------------
[select]
# "all"       - every file
# "extension" - final extension is one of `extensions`
# "substring" - file name contains `pattern` anywhere (legacy, matches a.jpg.bak)
rule = "all"
# extensions = ["jpg", "jpeg"]
# pattern = ".jpg"
# case_sensitive = false

# ---------------------------------------------------------------------------
# Output naming: <prefix><stem>.jpg
# ---------------------------------------------------------------------------
[output]
# With an empty prefix and no directory, a.jpg is overwritten in place.
prefix = ""
# Write outputs here instead of next to the sources (relative to the source dir).
# directory = "resized"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_blog_preset() {
        let config = ResizeConfig::default();
        assert_eq!(config, Preset::Blog.config());
        assert_eq!(config.target_width, 1400);
        assert_eq!(config.policy, ResizePolicy::OnlyIfWider);
        assert_eq!(config.select, Selection::All);
        assert_eq!(config.output.prefix, "");
    }

    #[test]
    fn thumbnail_preset_values() {
        let config = Preset::Thumbnail.config();
        assert_eq!(config.target_width, 720);
        assert_eq!(config.select, Selection::jpeg_files());
        assert_eq!(config.output.prefix, "3_");
        assert_eq!(config.quality, 90);
    }

    #[test]
    fn preset_names_on_command_line() {
        use clap::ValueEnum;
        assert_eq!(Preset::from_str("blog", false), Ok(Preset::Blog));
        assert_eq!(Preset::from_str("thumbnail", false), Ok(Preset::Thumbnail));
        assert!(Preset::from_str("poster", false).is_err());
    }

    #[test]
    fn presets_validate() {
        assert!(Preset::Blog.config().validate().is_ok());
        assert!(Preset::Thumbnail.config().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config: ResizeConfig = toml::from_str("target_width = 800").unwrap();
        assert_eq!(config.target_width, 800);
        assert_eq!(config.quality, 90);
        assert_eq!(config.select, Selection::All);
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ResizeConfig, _> = toml::from_str("widht = 800");
        assert!(result.is_err());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: ResizeConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ResizeConfig::default());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn width_beyond_jpeg_limit_invalid() {
        let config = ResizeConfig {
            target_width: 70_000,
            ..ResizeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        let config = ResizeConfig {
            target_width: MAX_JPEG_DIMENSION,
            ..ResizeConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_width_invalid() {
        let config = ResizeConfig {
            target_width: 0,
            ..ResizeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn quality_out_of_range_invalid() {
        for quality in [0, 101] {
            let config = ResizeConfig {
                quality,
                ..ResizeConfig::default()
            };
            assert!(config.validate().is_err(), "quality {quality}");
        }
    }

    #[test]
    fn empty_extensions_invalid() {
        let config = ResizeConfig {
            select: Selection::Extension {
                extensions: vec![],
                case_sensitive: false,
            },
            ..ResizeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ResizeConfig {
            select: Selection::Extension {
                extensions: vec![".".to_string()],
                case_sensitive: false,
            },
            ..ResizeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_substring_invalid() {
        let config = ResizeConfig {
            select: Selection::Substring {
                pattern: String::new(),
                case_sensitive: true,
            },
            ..ResizeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge / load tests
    // =========================================================================

    #[test]
    fn merge_overrides_scalar_and_keeps_rest() {
        let base = preset_value(Preset::Thumbnail).unwrap();
        let overlay: toml::Value = toml::from_str("quality = 75").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.quality, 75);
        assert_eq!(config.target_width, 720);
        assert_eq!(config.output.prefix, "3_");
    }

    #[test]
    fn merge_nested_table_key_by_key() {
        let base = preset_value(Preset::Thumbnail).unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[select]
case_sensitive = true
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(
            config.select,
            Selection::Extension {
                extensions: vec!["jpg".to_string(), "jpeg".to_string()],
                case_sensitive: true,
            }
        );
    }

    #[test]
    fn merge_switching_rule_replaces_select() {
        let base = preset_value(Preset::Thumbnail).unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[select]
rule = "substring"
pattern = ".jpg"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        assert!(merged["select"].get("extensions").is_none());

        let config: ResizeConfig = merged.try_into().unwrap();
        assert_eq!(
            config.select,
            Selection::Substring {
                pattern: ".jpg".to_string(),
                case_sensitive: false,
            }
        );
    }

    #[test]
    fn load_config_returns_preset_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), Preset::Thumbnail).unwrap();
        assert_eq!(config, Preset::Thumbnail.config());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
target_width = 1024
policy = "always"

[output]
directory = "out"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), Preset::Blog).unwrap();
        assert_eq!(config.target_width, 1024);
        assert_eq!(config.policy, ResizePolicy::Always);
        assert_eq!(config.output.directory, Some(PathBuf::from("out")));
        assert_eq!(config.output.prefix, "");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path(), Preset::Blog);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_invalid_value_is_validation_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "quality = 0").unwrap();
        let result = load_config(tmp.path(), Preset::Blog);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // derived settings
    // =========================================================================

    #[test]
    fn naming_resolves_relative_directory() {
        let config = ResizeConfig {
            output: OutputConfig {
                prefix: "3_".to_string(),
                directory: Some(PathBuf::from("small")),
            },
            ..ResizeConfig::default()
        };
        let naming = config.naming(Path::new("/photos"));
        assert_eq!(naming.directory, Some(PathBuf::from("/photos/small")));
        assert_eq!(naming.prefix, "3_");
    }

    #[test]
    fn naming_absolute_directory_wins() {
        let config = ResizeConfig {
            output: OutputConfig {
                prefix: String::new(),
                directory: Some(PathBuf::from("/out")),
            },
            ..ResizeConfig::default()
        };
        assert_eq!(
            config.naming(Path::new("/photos")).directory,
            Some(PathBuf::from("/out"))
        );
    }

    #[test]
    fn resize_params_from_config() {
        let params = Preset::Thumbnail.config().resize_params();
        assert_eq!(params.target_width, 720);
        assert_eq!(params.policy, ResizePolicy::OnlyIfWider);
    }
}
