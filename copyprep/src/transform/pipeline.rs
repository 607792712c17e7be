//! High-level pipeline API: read, clean and write a CSV file.
//!
//! # Example
//!
//! ```rust,ignore
//! use copyprep::{clean_file, CleanOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = clean_file(&CleanOptions::default())?;
//!     println!("Wrote cleaned CSV to {}", report.output.display());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{normalize_document, TransformStats};
use crate::error::{CleanError, CleanResult, WriteError, WriteResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::DEFAULT_COLUMNS;
use crate::parser::{read_document, SourceEncoding};
use crate::validation::validate_document;
use crate::writer::write_document;

/// Default source path.
pub const DEFAULT_INPUT: &str = "scripts/vendor_mapping.csv";

/// Default destination path.
pub const DEFAULT_OUTPUT: &str = "scripts/vendor_mapping_clean.csv";

/// Options for one cleaning run
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Number of fields every output row gets.
    pub columns: usize,
    pub encoding: SourceEncoding,
    /// Where to write a JSON run report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            columns: DEFAULT_COLUMNS,
            encoding: SourceEncoding::default(),
            report: None,
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Encoding the input was decoded with.
    pub encoding: String,
    pub columns: usize,
    #[serde(flatten)]
    pub stats: TransformStats,
    /// Characters substituted for undecodable input bytes.
    pub replacement_chars: usize,
}

/// Clean `options.input` into `options.output`.
///
/// The whole input is read and transformed before anything is written.
/// Either every row is written, or the run fails and the output path is
/// left as it was.
pub fn clean_file(options: &CleanOptions) -> CleanResult<CleanReport> {
    let columns = options.columns.max(1);

    // 1. Read
    log_info(format!(
        "Reading {} ({})",
        options.input.display(),
        options.encoding
    ));
    let parsed = read_document(&options.input, options.encoding)?;
    log_success(format!(
        "Read {} rows as {}",
        parsed.document.len(),
        parsed.encoding
    ));
    if parsed.document.is_empty() {
        log_warning(format!("{} holds no rows", options.input.display()));
    }
    if parsed.replacements > 0 {
        log_warning(format!(
            "Replaced {} undecodable byte sequence(s) in {}",
            parsed.replacements,
            options.input.display()
        ));
    }

    // 2. Reconcile + normalize
    let (document, stats) = normalize_document(parsed.document, columns);
    log_success(format!(
        "Normalized {} rows: {} padded ({} blank), {} collapsed, {} field(s) changed",
        stats.rows, stats.padded, stats.blank, stats.collapsed, stats.fields_changed
    ));

    // 3. Self-check before touching the destination
    validate_document(&document, columns).map_err(|violations| CleanError::Invalid { violations })?;

    let report = CleanReport {
        input: options.input.clone(),
        output: options.output.clone(),
        encoding: parsed.encoding,
        columns,
        stats,
        replacement_chars: parsed.replacements,
    };
    let rendered = match options.report {
        Some(ref report_path) => Some((report_path, render_report(report_path, &report)?)),
        None => None,
    };

    // 4. Write
    write_document(&options.output, &document)?;
    log_success(format!("Wrote {}", options.output.display()));

    // The cleaned CSV is already in place; a report failure does not undo it.
    if let Some((report_path, json)) = rendered {
        match save_report(report_path, &json) {
            Ok(()) => log_info(format!("Report written to {}", report_path.display())),
            Err(e) => log_warning(format!("Report not written: {}", e)),
        }
    }

    Ok(report)
}

fn report_error(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Report {
        path: path.to_path_buf(),
        source,
    }
}

fn render_report(path: &Path, report: &CleanReport) -> WriteResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| report_error(path, e.into()))
}

fn save_report(path: &Path, json: &str) -> WriteResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| report_error(path, e))?;
    }
    std::fs::write(path, json).map_err(|e| report_error(path, e))
}

/// Write `report` as pretty JSON.
pub fn write_report(path: &Path, report: &CleanReport) -> WriteResult<()> {
    let json = render_report(path, report)?;
    save_report(path, &json)
}
