//! Output invariant checks.
//!
//! A document is load-ready when every record has exactly the target number
//! of fields and no field contains a raw `\n` or `\r`.
//!
//! # Example
//!
//! ```rust,ignore
//! use copyprep::{validate_document, Document, Record};
//!
//! let doc: Document = vec![Record::from(vec!["a", "b", "c", "d"])].into_iter().collect();
//! assert!(validate_document(&doc, 4).is_ok());
//! ```

use std::fmt;

use crate::models::Document;

/// Which invariant a record broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    WrongWidth { found: usize, expected: usize },
    /// 1-based column holding a line break.
    LineBreak { column: usize },
}

/// One broken invariant, located by 1-based row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub row: usize,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::WrongWidth { found, expected } => {
                write!(f, "Row {}: {} fields (expected {})", self.row, found, expected)
            }
            ViolationKind::LineBreak { column } => {
                write!(f, "Row {}, column {}: contains a line break", self.row, column)
            }
        }
    }
}

/// Check every record of `document`.
///
/// # Returns
/// * `Ok(())` if every record conforms
/// * `Err(Vec<Violation>)` listing all violations in row order
pub fn validate_document(document: &Document, width: usize) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    for (idx, record) in document.iter().enumerate() {
        let row = idx + 1;

        if record.len() != width {
            violations.push(Violation {
                row,
                kind: ViolationKind::WrongWidth {
                    found: record.len(),
                    expected: width,
                },
            });
        }

        for (col, field) in record.iter().enumerate() {
            if field.contains(['\n', '\r']) {
                violations.push(Violation {
                    row,
                    kind: ViolationKind::LineBreak { column: col + 1 },
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    #[test]
    fn test_conforming_document() {
        let doc: Document = vec![
            Record::from(vec!["a", "b", "c", "d"]),
            Record::from(vec!["", "", "", ""]),
        ]
        .into_iter()
        .collect();
        assert!(validate_document(&doc, 4).is_ok());
    }

    #[test]
    fn test_reports_width_and_breaks() {
        let doc: Document = vec![
            Record::from(vec!["a", "b", "c", "d"]),
            Record::from(vec!["a", "b"]),
            Record::from(vec!["a", "b\nc", "d", "e\r"]),
        ]
        .into_iter()
        .collect();

        let errors = validate_document(&doc, 4).unwrap_err();
        assert_eq!(
            errors,
            vec![
                Violation {
                    row: 2,
                    kind: ViolationKind::WrongWidth { found: 2, expected: 4 },
                },
                Violation {
                    row: 3,
                    kind: ViolationKind::LineBreak { column: 2 },
                },
                Violation {
                    row: 3,
                    kind: ViolationKind::LineBreak { column: 4 },
                },
            ]
        );
    }

    #[test]
    fn test_violation_message_format() {
        let v = Violation {
            row: 7,
            kind: ViolationKind::WrongWidth { found: 5, expected: 4 },
        };
        let msg = v.to_string();
        assert!(msg.contains("Row 7"));
        assert!(msg.contains("5 fields"));
    }
}
