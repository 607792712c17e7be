//! Error types for the copyprep cleaning pipeline.
//!
//! One enum per phase, wrapped by a top-level enum:
//!
//! - [`ParseError`] - the source file cannot be read or decoded
//! - [`WriteError`] - the destination cannot be created or written
//! - [`CleanError`] - top-level errors returned by [`crate::clean_file`]
//!
//! Conversion is automatic via `From` implementations,
//! allowing `?` to work across phase boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::Violation;

// =============================================================================
// Read / Parse Errors
// =============================================================================

/// Errors while reading the source CSV.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Source file could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested encoding label is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The CSV reader rejected a record.
    #[error("Failed to parse record {record}: {message}")]
    Malformed { record: usize, message: String },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing the cleaned CSV or the run report.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Destination directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be created.
    #[error("Failed to create output file in {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be serialized or flushed.
    #[error("Failed to write {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Finished output could not be moved into place.
    #[error("Failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON run report could not be written.
    #[error("Failed to write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::clean_file`].
#[derive(Debug, Error)]
pub enum CleanError {
    /// Reading phase failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Writing phase failed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// The cleaned document broke an output invariant; nothing was written.
    #[error("Cleaned output failed self-check with {} violation(s)", .violations.len())]
    Invalid { violations: Vec<Violation> },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for read/parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type CleanResult<T> = Result<T, CleanError>;
