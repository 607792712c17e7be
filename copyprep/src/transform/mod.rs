//! Transformation module.
//!
//! This module turns parsed records into load-ready records:
//! - Reconcile: pad or collapse every record to the target width
//! - Cell: strip embedded line breaks from each field
//! - Pipeline: read → transform → write

pub mod cell;
pub mod pipeline;
pub mod reconcile;

use serde::Serialize;

use crate::models::{Document, Record};

pub use cell::{is_normalized, normalize_field};
pub use pipeline::*;
pub use reconcile::{reconcile, Reconciliation};

/// Counters collected over one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub rows: usize,
    /// Rows read from blank lines (no fields at all).
    pub blank: usize,
    /// Rows that were shorter than the target width.
    pub padded: usize,
    /// Rows that were wider than the target width.
    pub collapsed: usize,
    /// Fields whose text changed during normalization.
    pub fields_changed: usize,
}

/// Reconcile then normalize one record in place.
///
/// Returns what reconciliation did and how many fields normalization changed.
pub fn normalize_record(record: &mut Record, width: usize) -> (Reconciliation, usize) {
    let outcome = reconcile(record, width);

    let mut changed = 0;
    for field in record.fields_mut().iter_mut() {
        if !is_normalized(field) {
            *field = normalize_field(field);
            changed += 1;
        }
    }

    (outcome, changed)
}

/// Apply [`normalize_record`] to every record, preserving order.
pub fn normalize_document(document: Document, width: usize) -> (Document, TransformStats) {
    let mut stats = TransformStats::default();

    let records = document
        .into_iter()
        .enumerate()
        .map(|(idx, mut record)| {
            if record.is_empty() {
                stats.blank += 1;
            }
            let (outcome, changed) = normalize_record(&mut record, width);
            match outcome {
                Reconciliation::Unchanged => {}
                Reconciliation::Padded { added } => {
                    stats.padded += 1;
                    tracing::trace!(row = idx + 1, added, "padded short row");
                }
                Reconciliation::Collapsed { merged } => {
                    stats.collapsed += 1;
                    tracing::debug!(row = idx + 1, merged, "collapsed extra fields");
                }
            }
            stats.fields_changed += changed;
            record
        })
        .collect::<Document>();

    stats.rows = records.len();
    (records, stats)
}
