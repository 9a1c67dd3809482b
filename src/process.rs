//! Batch resizing.
//!
//! Walks the files selected by [`scan`](crate::scan) and runs each one through
//! decode → [`resize_to_width`] → [`save`], strictly one after another. Each
//! file's image is dropped before the next is opened.
//!
//! ## Failure isolation
//!
//! A file that cannot be decoded, resized, or saved is recorded in the
//! [`BatchSummary`] as [`FileOutcome::Failed`] and the batch moves on. Only
//! problems that prevent the batch from starting (unreadable source directory,
//! invalid config, uncreatable output directory) are returned as
//! [`ProcessError`].
//!
//! ## Progress
//!
//! Callers may pass an mpsc sender; a [`ProcessEvent`] is sent when the batch
//! starts and after every file. The CLI drains it on a printer thread.

use crate::config::{CONFIG_FILENAME, ConfigError, ResizeConfig};
use crate::imaging::{
    ImageBackend, RustBackend, SaveOutcome, SourceImage, get_dimensions, plan_dimensions,
    resize_to_width, save,
};
use crate::naming::OutputNaming;
use crate::scan::{ScanError, scan};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Step at which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Resize,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Decode => "decode",
            Stage::Resize => "resize",
            Stage::Encode => "encode",
        };
        f.write_str(label)
    }
}

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Written {
        output: PathBuf,
        /// Source dimensions (width, height)
        original: (u32, u32),
        /// Written dimensions (width, height)
        written: (u32, u32),
        resampled: bool,
        save: SaveOutcome,
    },
    Failed {
        stage: Stage,
        message: String,
    },
}

/// Per-file entry in a [`BatchSummary`].
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// 1-based position in the batch
    pub index: usize,
    pub source: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }
}

/// Result of a whole batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn written(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_failure()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failure()).count()
    }

    /// Files that needed the RGB fallback to save.
    pub fn converted(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    FileOutcome::Written {
                        save: SaveOutcome::ConvertedToRgb,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Progress notifications sent while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    BatchStarted { source_dir: PathBuf, file_count: usize },
    FileProcessed(FileReport),
}

/// A file the batch would touch, with its predicted output size.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    /// `None` when the header could not be read.
    pub original: Option<(u32, u32)>,
    /// Predicted output dimensions; equals `original` when no resample is due.
    pub planned: Option<(u32, u32)>,
}

/// Source files for a run: the scan result minus the config file itself.
fn select_sources(source_dir: &Path, config: &ResizeConfig) -> Result<Vec<PathBuf>, ScanError> {
    let mut sources = scan(source_dir, &config.select)?;
    sources.retain(|p| p.file_name().is_none_or(|n| n != CONFIG_FILENAME));
    Ok(sources)
}

/// Preview a run without decoding pixels or writing anything.
pub fn plan(source_dir: &Path, config: &ResizeConfig) -> Result<Vec<PlannedFile>, ProcessError> {
    plan_with_backend(&RustBackend::new(), source_dir, config)
}

/// [`plan`] with a specific backend (allows testing with mock).
pub fn plan_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    config: &ResizeConfig,
) -> Result<Vec<PlannedFile>, ProcessError> {
    config.validate()?;
    let naming = config.naming(source_dir);
    let params = config.resize_params();

    Ok(select_sources(source_dir, config)?
        .into_iter()
        .map(|source| {
            let original = get_dimensions(backend, &source).ok();
            let planned =
                original.map(|dims| plan_dimensions(dims, params).unwrap_or(dims));
            PlannedFile {
                output: naming.output_path(&source),
                source,
                original,
                planned,
            }
        })
        .collect())
}

/// Resize every selected file in `source_dir`.
pub fn process(
    source_dir: &Path,
    config: &ResizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    process_with_backend(&RustBackend::new(), source_dir, config, events)
}

/// Process a batch using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    config: &ResizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    config.validate()?;
    let sources = select_sources(source_dir, config)?;
    let naming = config.naming(source_dir);
    if let Some(dir) = &naming.directory {
        std::fs::create_dir_all(dir)?;
    }

    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            // Receiver gone means nobody is printing; the batch still runs
            tx.send(event).ok();
        }
    };

    emit(ProcessEvent::BatchStarted {
        source_dir: source_dir.to_path_buf(),
        file_count: sources.len(),
    });

    let mut summary = BatchSummary::default();
    for (i, source) in sources.into_iter().enumerate() {
        let outcome = process_file(backend, &source, &naming, config);
        if let FileOutcome::Failed { stage, message } = &outcome {
            log::debug!("{}: {stage} failed: {message}", source.display());
        }
        let report = FileReport {
            index: i + 1,
            source,
            outcome,
        };
        emit(ProcessEvent::FileProcessed(report.clone()));
        summary.reports.push(report);
    }

    Ok(summary)
}

/// Decode, resize, and save a single file.
pub fn process_file(
    backend: &impl ImageBackend,
    source: &Path,
    naming: &OutputNaming,
    config: &ResizeConfig,
) -> FileOutcome {
    let image = match SourceImage::open(backend, source) {
        Ok(image) => image,
        Err(e) => {
            return FileOutcome::Failed {
                stage: Stage::Decode,
                message: e.to_string(),
            };
        }
    };
    let original = image.dimensions();

    let resized = match resize_to_width(image, config.resize_params()) {
        Ok(resized) => resized,
        Err(e) => {
            return FileOutcome::Failed {
                stage: Stage::Resize,
                message: e.to_string(),
            };
        }
    };

    let output = naming.output_path(source);
    match save(backend, &resized, &output, config.quality()) {
        Ok(save) => FileOutcome::Written {
            output,
            original,
            written: resized.dimensions(),
            resampled: resized.resampled(),
            save,
        },
        Err(e) => FileOutcome::Failed {
            stage: Stage::Encode,
            message: e.to_string(),
        },
    }
}
