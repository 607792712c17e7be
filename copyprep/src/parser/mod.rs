//! CSV reading with permissive decoding.
//!
//! Bytes are decoded with a replacement strategy (undecodable sequences
//! become U+FFFD instead of failing), then split into records by the `csv`
//! reader: comma delimiter, double-quote quoting, doubled quotes as escapes,
//! quoted fields may span lines. Records may have any number of fields.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding_rs::{DecoderResult, Encoding};

use crate::error::{ParseError, ParseResult};
use crate::models::{Document, Record};

/// How to decode the source bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    Latin1,
    Windows1252,
    /// Guess with chardet, falling back to UTF-8.
    Auto,
}

impl FromStr for SourceEncoding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            "windows-1252" | "cp1252" => Ok(Self::Windows1252),
            "auto" => Ok(Self::Auto),
            other => Err(ParseError::UnknownEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin1",
            Self::Windows1252 => "windows-1252",
            Self::Auto => "auto",
        };
        f.write_str(label)
    }
}

/// Decoded source text plus what the decoder did to get it.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    /// Name of the encoding actually used.
    pub encoding: String,
    /// Number of U+FFFD characters substituted for bad input.
    pub replacements: usize,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub document: Document,
    pub encoding: String,
    pub replacements: usize,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

fn resolve(bytes: &[u8], encoding: SourceEncoding) -> &'static Encoding {
    match encoding {
        SourceEncoding::Utf8 => encoding_rs::UTF_8,
        // WHATWG treats latin1 labels as windows-1252, a superset.
        SourceEncoding::Latin1 | SourceEncoding::Windows1252 => encoding_rs::WINDOWS_1252,
        SourceEncoding::Auto => {
            let label = detect_encoding(bytes);
            Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8)
        }
    }
}

/// Decode `bytes`, pushing U+FFFD for each malformed sequence.
///
/// Returns the text and the number of substitutions made. U+FFFD characters
/// already present in the source are not counted.
fn decode_counting(encoding: &'static Encoding, bytes: &[u8]) -> (String, usize) {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = |d: &encoding_rs::Decoder, len: usize| {
        d.max_utf8_buffer_length_without_replacement(len)
            .unwrap_or(len.saturating_mul(3))
            .max(4)
    };

    let mut text = String::with_capacity(capacity(&decoder, bytes.len()));
    let mut replacements = 0;
    let mut src = bytes;

    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(src, &mut text, true);
        src = &src[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => text.reserve(capacity(&decoder, src.len())),
            DecoderResult::Malformed(_, _) => {
                text.push(char::REPLACEMENT_CHARACTER);
                replacements += 1;
            }
        }
    }

    (text, replacements)
}

/// Decode bytes, replacing anything undecodable with U+FFFD.
pub fn decode_content(bytes: &[u8], encoding: SourceEncoding) -> Decoded {
    let mut body = bytes;
    let mut chosen = resolve(bytes, encoding);

    if let Some((bom_encoding, bom_len)) = Encoding::for_bom(bytes) {
        if bom_encoding == encoding_rs::UTF_8 && chosen == encoding_rs::UTF_8 {
            body = &bytes[bom_len..];
        } else if encoding == SourceEncoding::Auto {
            chosen = bom_encoding;
            body = &bytes[bom_len..];
        }
    }

    let (text, replacements) = decode_counting(chosen, body);

    Decoded {
        text,
        encoding: chosen.name().to_string(),
        replacements,
    }
}

fn is_line_break(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

/// Line breaks in the run of `\r`/`\n` bytes surrounding offset `at`.
///
/// An unquoted field never holds a line break, so between two records this
/// run is exactly the first record's terminator plus any blank lines.
fn breaks_around(bytes: &[u8], at: usize) -> usize {
    let at = at.min(bytes.len());
    let start = bytes[..at]
        .iter()
        .rposition(|b| !is_line_break(*b))
        .map_or(0, |i| i + 1);
    let end = bytes[at..]
        .iter()
        .position(|b| !is_line_break(*b))
        .map_or(bytes.len(), |i| at + i);

    let run = &bytes[start..end];
    let mut breaks = 0;
    let mut i = 0;
    while i < run.len() {
        // CRLF is one break
        i += if run[i] == b'\r' && run.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
        breaks += 1;
    }
    breaks
}

fn push_blank_lines(document: &mut Document, count: usize) {
    for _ in 0..count {
        document.push(Record::default());
    }
}

/// Split decoded text into records.
///
/// Each blank physical line yields an empty record in its position. The
/// line break ending the last record does not add one.
pub fn parse_str(text: &str) -> ParseResult<Document> {
    let bytes = text.as_bytes();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut document = Document::default();

    // Blank lines before the first record have no terminator to discount.
    let leading = bytes.iter().take_while(|b| is_line_break(**b)).count();
    push_blank_lines(&mut document, breaks_around(&bytes[..leading], 0));

    let mut record = csv::StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| ParseError::Malformed {
                record: document.len() + 1,
                message: e.to_string(),
            })?;
        if !more {
            break;
        }
        document.push(Record::from(&record));

        let consumed = reader.position().byte() as usize;
        push_blank_lines(&mut document, breaks_around(bytes, consumed).saturating_sub(1));
    }

    Ok(document)
}

/// Decode and parse raw bytes.
pub fn parse_bytes(bytes: &[u8], encoding: SourceEncoding) -> ParseResult<(Document, Decoded)> {
    let decoded = decode_content(bytes, encoding);
    let document = parse_str(&decoded.text)?;
    Ok((document, decoded))
}

/// Read, decode and parse a CSV file.
///
/// # Example
/// ```ignore
/// let parsed = read_document("scripts/vendor_mapping.csv", SourceEncoding::Utf8)?;
/// println!("{} records ({})", parsed.document.len(), parsed.encoding);
/// ```
pub fn read_document<P: AsRef<Path>>(path: P, encoding: SourceEncoding) -> ParseResult<ParsedFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (document, decoded) = parse_bytes(&bytes, encoding)?;

    Ok(ParsedFile {
        path: path.to_path_buf(),
        document,
        encoding: decoded.encoding,
        replacements: decoded.replacements,
    })
}
