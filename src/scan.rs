//! Source discovery.
//!
//! Lists one directory (never its subdirectories) and keeps the files a
//! [`Selection`] rule accepts. Hidden entries (leading `.`) and directories
//! are always skipped. Results come back sorted by file name so runs are
//! reproducible.
//!
//! ## Selection rules
//!
//! | Rule | Matches | Example hits for `jpg` |
//! |---|---|---|
//! | `extension` (default) | final extension equals one of the list | `a.jpg`, `B.JPG` |
//! | `substring` | name contains the pattern anywhere | `a.jpg`, `c.jpg.bak` |
//! | `all` | every non-hidden file | everything |
//!
//! `substring` is the loose "name contains `.jpg`" test, so `c.jpg.bak` matches.
//! It is kept for compatibility only; `extension` is the stricter rule.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Which directory entries count as inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Selection {
    /// The final extension (without the dot) equals one of `extensions`.
    Extension {
        extensions: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    /// The file name contains `pattern` anywhere.
    Substring {
        pattern: String,
        #[serde(default)]
        case_sensitive: bool,
    },
    /// Every non-hidden file.
    All,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::jpeg_files()
    }
}

impl Selection {
    /// Case-insensitive `.jpg` / `.jpeg` extension match.
    pub fn jpeg_files() -> Self {
        Selection::Extension {
            extensions: vec!["jpg".to_string(), "jpeg".to_string()],
            case_sensitive: false,
        }
    }

    /// Whether a file name is selected.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Selection::Extension {
                extensions,
                case_sensitive,
            } => {
                let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
                    return false;
                };
                extensions.iter().map(|e| e.trim_start_matches('.')).any(|e| {
                    if *case_sensitive {
                        e == ext
                    } else {
                        e.eq_ignore_ascii_case(ext)
                    }
                })
            }
            Selection::Substring {
                pattern,
                case_sensitive,
            } => {
                if *case_sensitive {
                    name.contains(pattern.as_str())
                } else {
                    name.to_lowercase().contains(&pattern.to_lowercase())
                }
            }
            Selection::All => true,
        }
    }
}

/// List the files in `dir` that `selection` accepts, sorted by name.
pub fn scan(dir: &Path, selection: &Selection) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut selected = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_file() {
            continue;
        }
        if selection.matches(&name) {
            selected.push(entry.into_path());
        } else {
            log::debug!("skipping {}: not selected", entry.path().display());
        }
    }

    Ok(selected)
}
