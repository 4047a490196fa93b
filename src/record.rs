//! Object-file records. Every record is one line with fixed columns:
//!
//! ```text
//! H<name><start:6><length:6>
//! T<start:6><len:2><body..>
//! M...
//! E[<first:6>]
//! ```

use serde::Serialize;
use tracing::warn;

use crate::hex::{parse_hex, parse_hex_bytes, HexError};

/// Column where a text record's object code begins.
pub const TEXT_BODY_COL: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectRecord {
    Header {
        name: String,
        start: u32,
        length: u32,
    },
    Text {
        start: u32,
        declared_len: u8,
        body: Vec<u8>,
    },
    Modification,
    End {
        first: Option<u32>,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("line {line}: record shorter than its fixed fields ({need} columns, have {have})")]
    Malformed { line: usize, need: usize, have: usize },
    #[error("line {line}: bad hex field: {source}")]
    BadHex {
        line: usize,
        #[source]
        source: HexError,
    },
    #[error("line {line}: unknown record tag {tag:?}")]
    UnknownTag { line: usize, tag: char },
    #[error("object file has no header record")]
    MissingHeader,
    #[error("line {line}: header record must come first")]
    HeaderNotFirst { line: usize },
    #[error("object file has no end record")]
    MissingEnd,
    #[error("line {line}: record after the end record")]
    AfterEnd { line: usize },
}

fn field(line: usize, row: &str, at: usize, len: usize) -> Result<&str, RecordError> {
    row.get(at..at + len).ok_or(RecordError::Malformed { line, need: at + len, have: row.len() })
}

fn hex_field(line: usize, row: &str, at: usize, len: usize) -> Result<u32, RecordError> {
    parse_hex(field(line, row, at, len)?).map_err(|source| RecordError::BadHex { line, source })
}

/// Parse a single record line. `line` is 1-based and only used in errors.
pub fn parse_record(line: usize, row: &str) -> Result<ObjectRecord, RecordError> {
    let row = row.trim_end();
    if !row.is_ascii() {
        return Err(RecordError::BadHex {
            line,
            source: HexError::BadDigit {
                text: row.to_string(),
                ch: row.chars().find(|c| !c.is_ascii()).unwrap_or('?'),
            },
        });
    }
    let Some(tag) = row.chars().next() else {
        return Err(RecordError::Malformed { line, need: 1, have: 0 });
    };
    match tag {
        'H' => {
            let name: String = row[1..].chars().take_while(|c| c.is_ascii_alphabetic()).collect();
            let at = 1 + name.len();
            let start = hex_field(line, row, at, 6)?;
            let length = hex_field(line, row, at + 6, 6)?;
            Ok(ObjectRecord::Header { name, start, length })
        }
        'T' => {
            let start = hex_field(line, row, 1, 6)?;
            let declared_len = hex_field(line, row, 7, 2)? as u8;
            let body = parse_hex_bytes(&row[TEXT_BODY_COL..]).map_err(|source| RecordError::BadHex { line, source })?;
            if body.len() != declared_len as usize {
                warn!(line, declared = declared_len, actual = body.len(), "text record length mismatch");
            }
            Ok(ObjectRecord::Text { start, declared_len, body })
        }
        'M' => Ok(ObjectRecord::Modification),
        'E' => {
            let first = match row.get(1..7) {
                Some(f) => Some(parse_hex(f).map_err(|source| RecordError::BadHex { line, source })?),
                None => None,
            };
            Ok(ObjectRecord::End { first })
        }
        tag => Err(RecordError::UnknownTag { line, tag }),
    }
}

/// A parsed object file: header fields plus the records in file order.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectFile {
    pub name: String,
    pub start: u32,
    pub length: u32,
    pub records: Vec<ObjectRecord>,
}

impl ObjectFile {
    /// Address one past the program's last byte.
    pub fn end_address(&self) -> u32 {
        self.start.wrapping_add(self.length)
    }

    /// Start address of the first text record after `records[idx]`.
    pub fn next_text_start(&self, idx: usize) -> Option<u32> {
        self.records[idx + 1..].iter().find_map(|r| match r {
            ObjectRecord::Text { start, .. } => Some(*start),
            _ => None,
        })
    }
}

/// Parse a whole object file, checking the header comes first and the end
/// record comes last. Blank lines are skipped.
pub fn parse_object(text: &str) -> Result<ObjectFile, RecordError> {
    let mut header = None;
    let mut records = Vec::new();
    let mut ended = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if ended {
            return Err(RecordError::AfterEnd { line });
        }
        let rec = parse_record(line, raw)?;
        match &rec {
            ObjectRecord::Header { name, start, length } if header.is_none() => {
                header = Some((name.clone(), *start, *length));
            }
            ObjectRecord::Header { .. } => return Err(RecordError::HeaderNotFirst { line }),
            _ if header.is_none() => return Err(RecordError::HeaderNotFirst { line }),
            _ => {}
        }
        ended = matches!(rec, ObjectRecord::End { .. });
        records.push(rec);
    }

    let (name, start, length) = header.ok_or(RecordError::MissingHeader)?;
    if !ended {
        return Err(RecordError::MissingEnd);
    }
    Ok(ObjectFile { name, start, length, records })
}
