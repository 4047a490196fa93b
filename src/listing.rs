use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::hex::fmt_addr4;

/// One line of the reconstructed source listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingLine {
    /// None for directives that carry no location (BASE, LTORG, END).
    pub addr: Option<u32>,
    pub label: String,
    pub mnemonic: String,
    pub operand: String,
    /// Object code as uppercase hex; empty for directives.
    pub object: String,
}

impl ListingLine {
    pub fn new(addr: u32, label: &str, mnemonic: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            addr: Some(addr),
            label: label.to_string(),
            mnemonic: mnemonic.into(),
            operand: operand.into(),
            object: String::new(),
        }
    }

    pub fn directive(mnemonic: &str, operand: impl Into<String>) -> Self {
        Self { mnemonic: mnemonic.to_string(), operand: operand.into(), ..Self::default() }
    }

    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = object.into();
        self
    }
}

impl fmt::Display for ListingLine {
    /// Tab-separated columns; trailing empty columns are dropped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.addr.map(fmt_addr4).unwrap_or_default();
        let cols: [&str; 5] = [&addr, &self.label, &self.mnemonic, &self.operand, &self.object];
        let used = cols.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        write!(f, "{}", cols[..used].join("\t"))
    }
}

/// Sink for finished listing lines.
pub trait Emitter {
    fn emit(&mut self, line: ListingLine) -> io::Result<()>;
}

impl Emitter for Vec<ListingLine> {
    fn emit(&mut self, line: ListingLine) -> io::Result<()> {
        self.push(line);
        Ok(())
    }
}

/// Writes each line followed by a newline.
pub struct WriteEmitter<W: Write> {
    out: W,
}

impl<W: Write> WriteEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Emitter for WriteEmitter<W> {
    fn emit(&mut self, line: ListingLine) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }
}

/// Render a listing as text.
pub fn render(lines: &[ListingLine]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_tab_separated() {
        let l = ListingLine::new(0x3, "", "LDB", "#LENGTH").with_object("69202D");
        assert_eq!(l.to_string(), "0003\t\tLDB\t#LENGTH\t69202D");
        let l = ListingLine::new(0x36, "BUFFER", "RESB", "4096");
        assert_eq!(l.to_string(), "0036\tBUFFER\tRESB\t4096");
        assert_eq!(ListingLine::directive("LTORG", "").to_string(), "\t\tLTORG");
        assert_eq!(ListingLine::directive("END", "COPY").to_string(), "\t\tEND\tCOPY");
    }

    #[test]
    fn write_emitter_appends_newlines() {
        let mut e = WriteEmitter::new(Vec::new());
        e.emit(ListingLine::directive("BASE", "LENGTH")).unwrap();
        e.emit(ListingLine::directive("LTORG", "")).unwrap();
        assert_eq!(String::from_utf8(e.into_inner()).unwrap(), "\t\tBASE\tLENGTH\n\t\tLTORG\n");
    }
}
