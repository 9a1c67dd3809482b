//! CLI output formatting for `scan` and `run`.
//!
//! # Entity Display Contract
//!
//! Every file follows the same two-level pattern in both commands:
//!
//! 1. **Header line**: positional index + source file name (+ output name)
//! 2. **Context lines**: indented dimensions, fallback notes, failures
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! 001 a.jpg → 3_a.jpg
//!     2000x1000 → 720x360
//! 002 b.jpg → 3_b.jpg
//!     500x400 (kept)
//! 003 broken.jpg → 3_broken.jpg
//!     unreadable
//!
//! 3 files selected
//! ```
//!
//! ## Run
//!
//! ```text
//! Resizing 3 files in photos
//! 001 a.jpg → 3_a.jpg
//!     2000x1000 → 720x360
//!     converted to RGB
//! 002 broken.jpg
//!     decode failed: Failed to decode photos/broken.jpg: ...
//!
//! Wrote 1 file, 1 failed, 1 converted to RGB
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::imaging::SaveOutcome;
use crate::process::{BatchSummary, FileOutcome, FileReport, PlannedFile, ProcessEvent};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Output path as the user would want to read it: bare name when it sits next
/// to the source, full path otherwise.
fn output_label(source: &Path, output: &Path) -> String {
    if source.parent() == output.parent() {
        file_name(output)
    } else {
        output.display().to_string()
    }
}

fn dims(d: (u32, u32)) -> String {
    format!("{}x{}", d.0, d.1)
}

fn dimension_change(original: (u32, u32), written: (u32, u32)) -> String {
    if original == written {
        format!("{} (kept)", dims(original))
    } else {
        format!("{} \u{2192} {}", dims(original), dims(written))
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the file list a run would process.
pub fn format_plan(planned: &[PlannedFile]) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, file) in planned.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            file_name(&file.source),
            output_label(&file.source, &file.output)
        ));
        match (file.original, file.planned) {
            (Some(original), Some(planned)) => {
                lines.push(format!("    {}", dimension_change(original, planned)));
            }
            _ => lines.push("    unreadable".to_string()),
        }
    }

    lines.push(String::new());
    lines.push(format!("{} selected", plural(planned.len(), "file")));
    lines
}

/// Print scan output to stdout.
pub fn print_plan(planned: &[PlannedFile]) {
    for line in format_plan(planned) {
        println!("{}", line);
    }
}

// ============================================================================
// Run output
// ============================================================================

/// Format one file's result.
pub fn format_file_report(report: &FileReport) -> Vec<String> {
    let mut lines = Vec::new();
    let index = format_index(report.index);
    let source = file_name(&report.source);

    match &report.outcome {
        FileOutcome::Written {
            output,
            original,
            written,
            save,
            ..
        } => {
            lines.push(format!(
                "{} {} \u{2192} {}",
                index,
                source,
                output_label(&report.source, output)
            ));
            lines.push(format!("    {}", dimension_change(*original, *written)));
            if *save == SaveOutcome::ConvertedToRgb {
                lines.push("    converted to RGB".to_string());
            }
        }
        FileOutcome::Failed { stage, message } => {
            lines.push(format!("{} {}", index, source));
            lines.push(format!("    {} failed: {}", stage, message));
        }
    }
    lines
}

/// Format a progress event from a running batch.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            source_dir,
            file_count,
        } => vec![format!(
            "Resizing {} in {}",
            plural(*file_count, "file"),
            source_dir.display()
        )],
        ProcessEvent::FileProcessed(report) => format_file_report(report),
    }
}

/// Format the closing summary line.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let mut parts = vec![format!("Wrote {}", plural(summary.written(), "file"))];
    if summary.failed() > 0 {
        parts.push(format!("{} failed", summary.failed()));
    }
    if summary.converted() > 0 {
        parts.push(format!("{} converted to RGB", summary.converted()));
    }
    vec![String::new(), parts.join(", ")]
}

/// Print the closing summary to stdout.
pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}
