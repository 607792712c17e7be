//! CSV serialization and atomic file output.
//!
//! Fields are quoted only when they contain a comma, a quote or a line
//! break; quotes inside a quoted field are doubled. Records end with CRLF.
//!
//! The file is written to a temporary sibling in the destination directory
//! and renamed over the target once every row is flushed, so a failed run
//! never leaves a partial target behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{WriteError, WriteResult};
use crate::models::Document;

fn csv_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out)
}

/// Write every record of `document` to `out`, in order.
pub fn serialize_document<W: Write>(out: W, document: &Document) -> csv::Result<()> {
    let mut writer = csv_writer(out);
    for record in document {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write `document` to `path`, creating the parent directory if needed.
pub fn write_document<P: AsRef<Path>>(path: P, document: &Document) -> WriteResult<()> {
    let path = path.as_ref();
    let dir = parent_dir(path);

    fs::create_dir_all(&dir).map_err(|source| WriteError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| WriteError::Create {
        path: dir.clone(),
        source,
    })?;

    serialize_document(tmp.as_file_mut(), document).map_err(|source| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    tmp.as_file()
        .sync_all()
        .map_err(|source| WriteError::Persist {
            path: path.to_path_buf(),
            source,
        })?;

    tmp.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::debug!(path = %path.display(), rows = document.len(), "output persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn doc(rows: Vec<Vec<&str>>) -> Document {
        rows.into_iter().map(Record::from).collect()
    }

    fn to_csv_string(document: &Document) -> String {
        let mut buf = Vec::new();
        serialize_document(&mut buf, document).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_minimal_quoting() {
        let out = to_csv_string(&doc(vec![vec!["a", "b", "c", "d,e"]]));
        assert_eq!(out, "a,b,c,\"d,e\"\r\n");
    }

    #[test]
    fn test_quotes_doubled() {
        let out = to_csv_string(&doc(vec![vec!["12\" rack", "x", "", ""]]));
        assert_eq!(out, "\"12\"\" rack\",x,,\r\n");
    }

    #[test]
    fn test_empty_fields_unquoted() {
        let out = to_csv_string(&doc(vec![vec!["a", "b", "", ""]]));
        assert_eq!(out, "a,b,,\r\n");
    }

    #[test]
    fn test_plain_fields_unquoted() {
        let out = to_csv_string(&doc(vec![vec!["a", "b c", "c d", "e"]]));
        assert_eq!(out, "a,b c,c d,e\r\n");
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("deeper").join("clean.csv");

        write_document(&target, &doc(vec![vec!["a", "b", "c", "d"]])).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "a,b,c,d\r\n");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clean.csv");
        fs::write(&target, "stale contents\n").unwrap();

        write_document(&target, &doc(vec![vec!["x", "", "", ""]])).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "x,,,\r\n");
    }

    #[test]
    fn test_directory_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = write_document(blocker.join("clean.csv"), &doc(vec![vec!["a"]]));
        assert!(matches!(result, Err(WriteError::CreateDir { .. })));
    }

    #[test]
    fn test_failed_persist_leaves_no_debris() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let result = write_document(&target, &doc(vec![vec!["a", "b", "c", "d"]]));
        assert!(matches!(result, Err(WriteError::Persist { .. })));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("taken")]);
    }
}
