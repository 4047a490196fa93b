//! Loader for the assembler's cross-reference report (`.sym`).
//!
//! The report carries two sections. A line starting with `Symbol` opens the
//! symbol section (`NAME ADDRESS [flags..]` rows); a line starting with `Name`
//! opens the literal section (`[NAME] TEXT LEN ADDRESS` rows, the name
//! column blank for anonymous literals). Dash rules and blank lines are
//! separators.

use crate::hex::{parse_hex, HexError};
use crate::tables::{Literal, LiteralTable, SymbolTable, Tables};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("line {line}: {reason}")]
    BadRow { line: usize, reason: String },
    #[error("line {line}: bad address: {source}")]
    BadAddress {
        line: usize,
        #[source]
        source: HexError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Symbols,
    Literals,
}

pub fn parse_report(text: &str) -> Result<Tables, ReportError> {
    let mut symbols = SymbolTable::new();
    let mut literals = LiteralTable::new();
    let mut section = Section::None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let row = raw.trim_end();
        if row.trim().is_empty() || row.starts_with('-') {
            continue;
        }
        if row.starts_with("Symbol") {
            section = Section::Symbols;
            continue;
        }
        if row.starts_with("Name") {
            section = Section::Literals;
            continue;
        }
        match section {
            Section::None => {}
            Section::Symbols => {
                let (addr, name) = parse_symbol_row(line, row)?;
                symbols.insert(addr, name);
            }
            Section::Literals => {
                let (addr, lit) = parse_literal_row(line, row)?;
                literals.insert(addr, lit);
            }
        }
    }

    Ok(Tables { symbols, literals })
}

fn parse_symbol_row(line: usize, row: &str) -> Result<(u32, String), ReportError> {
    let mut fields = row.split_whitespace();
    let (Some(name), Some(addr)) = (fields.next(), fields.next()) else {
        return Err(ReportError::BadRow { line, reason: format!("symbol row needs name and address: {row:?}") });
    };
    let addr = parse_hex(addr).map_err(|source| ReportError::BadAddress { line, source })?;
    Ok((addr, name.to_string()))
}

fn parse_literal_row(line: usize, row: &str) -> Result<(u32, Literal), ReportError> {
    let fields: Vec<&str> = row.split_whitespace().collect();
    // a blank first column means the literal has no name
    let anonymous = row.starts_with(char::is_whitespace) || fields.len() == 3;
    let (name, rest) = match (anonymous, fields.as_slice()) {
        (true, [text, len, addr, ..]) => ("", [*text, *len, *addr]),
        (false, [name, text, len, addr, ..]) => (*name, [*text, *len, *addr]),
        _ => {
            return Err(ReportError::BadRow { line, reason: format!("literal row needs text, length and address: {row:?}") })
        }
    };
    let [text, len, addr] = rest;
    let len: usize = len
        .parse()
        .map_err(|_| ReportError::BadRow { line, reason: format!("bad literal length {len:?}") })?;
    let addr = parse_hex(addr).map_err(|source| ReportError::BadAddress { line, source })?;
    Ok((addr, Literal { name: name.to_string(), text: text.to_string(), len }))
}
