//! # Copyprep - CSV cleanup for PostgreSQL `COPY`
//!
//! Copyprep reads a CSV export, forces every row to a fixed number of
//! columns, strips line breaks embedded in quoted fields and writes a CSV
//! that `COPY ... WITH (FORMAT csv)` loads without complaint.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Parser    │────▶│  Transform  │────▶│  Clean CSV  │
//! │ (any width) │     │ (lossy dec) │     │ (pad/strip) │     │  (4 cols)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use copyprep::{clean_file, CleanOptions};
//!
//! let report = clean_file(&CleanOptions::default()).unwrap();
//! println!("Cleaned {} rows", report.stats.rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per phase
//! - [`models`] - Record and Document
//! - [`parser`] - Decoding and CSV parsing
//! - [`transform`] - Reconciliation, normalization and pipeline
//! - [`validation`] - Output invariant checks
//! - [`writer`] - CSV serialization and atomic output
//! - [`logs`] - Tracing setup

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod writer;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CleanError, CleanResult, ParseError, ParseResult, WriteError, WriteResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Document, Field, Record, DEFAULT_COLUMNS};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_bytes,
    parse_str,
    read_document,
    Decoded,
    ParsedFile,
    SourceEncoding,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    is_normalized,
    normalize_document,
    normalize_field,
    normalize_record,
    reconcile,
    Reconciliation,
    TransformStats,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    clean_file,
    write_report,
    CleanOptions,
    CleanReport,
    DEFAULT_INPUT,
    DEFAULT_OUTPUT,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_document, Violation, ViolationKind};

// =============================================================================
// Re-exports - Writer
// =============================================================================

pub use writer::{serialize_document, write_document};
