pub mod classify;
pub mod decoder;
pub mod disasm;
pub mod engine;
pub mod hex;
pub mod input;
pub mod listing;
pub mod opcodes;
pub mod record;
pub mod reserve;
pub mod resolve;
pub mod session;
pub mod symfile;
pub mod tables;

pub mod isa {
    pub mod sicxe; // SIC/XE 2/3/4-byte encodings
}

pub use engine::{DisasmError, Disassembler, RunSummary};
pub use listing::{Emitter, ListingLine, WriteEmitter};
pub use record::{parse_object, ObjectFile, ObjectRecord};
pub use session::DecodeSession;
pub use symfile::parse_report;
pub use tables::{Literal, LiteralTable, SymbolTable, Tables};

/// Parse both inputs and disassemble them into listing lines.
pub fn disassemble(object: &str, report: &str) -> Result<(Vec<ListingLine>, RunSummary), DisasmError> {
    let obj = parse_object(object)?;
    let tables = parse_report(report)?;
    let mut lines = Vec::new();
    let summary = Disassembler::new(tables).run(&obj, &mut lines)?;
    Ok((lines, summary))
}
