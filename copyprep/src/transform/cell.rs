//! Per-field line break removal.

/// Replace every `\n` and `\r` with a space, then trim surrounding whitespace.
///
/// A CRLF pair becomes two spaces; interior runs are not collapsed.
pub fn normalize_field(value: &str) -> String {
    value
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// True when [`normalize_field`] would leave `value` as it is.
pub fn is_normalized(value: &str) -> bool {
    !value.contains(['\n', '\r']) && value.trim().len() == value.len()
}
