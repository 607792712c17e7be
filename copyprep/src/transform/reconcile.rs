//! Force a record to a fixed number of fields.
//!
//! ```text
//! a,b          →  a,b,,        (padded with empty fields)
//! a,b,c,d      →  a,b,c,d      (unchanged)
//! a,b,c,d,e    →  a,b,c,"d,e"  (tail joined into the last column)
//! ```
//!
//! The collapse is lossy: once joined, the original boundaries between the
//! extra fields cannot be told apart from commas inside a field.

use crate::models::{Field, Record};

/// What [`reconcile`] did to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    /// `added` empty fields were appended.
    Padded { added: usize },
    /// `merged` trailing fields were joined into the last column.
    Collapsed { merged: usize },
}

/// Pad or collapse `record` in place so it has exactly `width` fields.
///
/// A `width` of zero is treated as one.
pub fn reconcile(record: &mut Record, width: usize) -> Reconciliation {
    let width = width.max(1);
    let fields = record.fields_mut();

    match fields.len() {
        len if len == width => Reconciliation::Unchanged,
        len if len < width => {
            fields.resize_with(width, Field::new);
            Reconciliation::Padded { added: width - len }
        }
        len => {
            let tail = fields.split_off(width - 1);
            fields.push(tail.join(","));
            Reconciliation::Collapsed {
                merged: len - width + 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciled(fields: Vec<&str>, width: usize) -> (Vec<String>, Reconciliation) {
        let mut record = Record::from(fields);
        let outcome = reconcile(&mut record, width);
        (record.into_fields(), outcome)
    }

    #[test]
    fn test_pads_short_row() {
        let (fields, outcome) = reconciled(vec!["a", "b"], 4);
        assert_eq!(fields, vec!["a", "b", "", ""]);
        assert_eq!(outcome, Reconciliation::Padded { added: 2 });
    }

    #[test]
    fn test_pads_empty_row() {
        let (fields, outcome) = reconciled(vec![], 4);
        assert_eq!(fields, vec!["", "", "", ""]);
        assert_eq!(outcome, Reconciliation::Padded { added: 4 });
    }

    #[test]
    fn test_exact_width_untouched() {
        let (fields, outcome) = reconciled(vec!["a", "b", "c", "d"], 4);
        assert_eq!(fields, vec!["a", "b", "c", "d"]);
        assert_eq!(outcome, Reconciliation::Unchanged);
    }

    #[test]
    fn test_collapses_extra_fields() {
        let (fields, outcome) = reconciled(vec!["a", "b", "c", "d", "e"], 4);
        assert_eq!(fields, vec!["a", "b", "c", "d,e"]);
        assert_eq!(outcome, Reconciliation::Collapsed { merged: 2 });
    }

    #[test]
    fn test_collapse_keeps_first_three_verbatim() {
        let (fields, _) = reconciled(vec![" a ", "b\n", "c", "1", "", "3", "4"], 4);
        assert_eq!(fields, vec![" a ", "b\n", "c", "1,,3,4"]);
    }

    #[test]
    fn test_other_widths() {
        let (fields, _) = reconciled(vec!["a", "b", "c"], 2);
        assert_eq!(fields, vec!["a", "b,c"]);

        let (fields, _) = reconciled(vec!["a", "b", "c"], 1);
        assert_eq!(fields, vec!["a,b,c"]);

        let (fields, _) = reconciled(vec!["a", "b"], 0);
        assert_eq!(fields, vec!["a,b"]);
    }
}
