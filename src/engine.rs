use std::io;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::{classify, Unit};
use crate::decoder::{DecodeError, Decoder};
use crate::hex::{fmt_addr6, fmt_bytes, strip_leading_zeros};
use crate::isa::sicxe::SicXeDecoder;
use crate::listing::{Emitter, ListingLine};
use crate::record::{ObjectFile, ObjectRecord, RecordError};
use crate::reserve::synthesize;
use crate::resolve::resolve;
use crate::session::DecodeSession;
use crate::symfile::ReportError;
use crate::tables::Tables;

#[derive(thiserror::Error, Debug)]
pub enum DisasmError {
    #[error("object file: {0}")]
    Record(#[from] RecordError),
    #[error("symbol report: {0}")]
    Report(#[from] ReportError),
    #[error("text record {record}, address {addr:06X}: {source}")]
    Decode {
        record: usize,
        addr: u32,
        #[source]
        source: DecodeError,
    },
    #[error("writing listing: {0}")]
    Emit(#[from] io::Error),
}

/// Counters gathered over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Instructions and constants decoded from text records.
    pub units: usize,
    /// Units that matched no opcode and were emitted as single bytes.
    pub unknown: usize,
    pub bytes_decoded: usize,
    /// RESB lines synthesized.
    pub reserved: usize,
    pub reserved_bytes: u32,
    pub final_pc: u32,
}

pub struct Disassembler<D: Decoder = SicXeDecoder> {
    dec: D,
    tables: Tables,
}

impl Disassembler<SicXeDecoder> {
    pub fn new(tables: Tables) -> Self {
        Self { dec: SicXeDecoder::new(), tables }
    }
}

impl<D: Decoder> Disassembler<D> {
    pub fn with_decoder(dec: D, tables: Tables) -> Self {
        Self { dec, tables }
    }

    /// Disassemble `obj` into `out` with a fresh session.
    pub fn run<E: Emitter>(&self, obj: &ObjectFile, out: &mut E) -> Result<RunSummary, DisasmError> {
        let mut session = DecodeSession::new(obj.start);
        self.run_with(&mut session, obj, out)
    }

    /// Disassemble `obj` using a caller-owned session, which is reset from
    /// the header first and left holding the final state.
    pub fn run_with<E: Emitter>(
        &self,
        session: &mut DecodeSession,
        obj: &ObjectFile,
        out: &mut E,
    ) -> Result<RunSummary, DisasmError> {
        session.reset(obj.start);
        let mut summary = RunSummary::default();

        let start_text = fmt_addr6(obj.start);
        out.emit(ListingLine::new(obj.start, &obj.name, "START", strip_leading_zeros(&start_text)))?;

        for (idx, rec) in obj.records.iter().enumerate() {
            match rec {
                ObjectRecord::Header { .. } => {}
                ObjectRecord::Text { start, body, .. } => {
                    if *start != session.pc {
                        warn!("text record {} starts at {start:06X} but pc is {:06X}", idx + 1, session.pc);
                    }
                    debug!("text record {} at {start:06X}, {} bytes", idx + 1, body.len());
                    self.decode_text(session, idx + 1, body, out, &mut summary)?;

                    let bound = obj.next_text_start(idx).unwrap_or_else(|| obj.end_address());
                    self.reserve(session, bound, out, &mut summary)?;
                }
                ObjectRecord::Modification => debug!("skipping modification record {}", idx + 1),
                ObjectRecord::End { .. } => out.emit(ListingLine::directive("END", obj.name.clone()))?,
            }
        }

        summary.final_pc = session.pc;
        Ok(summary)
    }

    fn decode_text<E: Emitter>(
        &self,
        session: &mut DecodeSession,
        record: usize,
        body: &[u8],
        out: &mut E,
        summary: &mut RunSummary,
    ) -> Result<(), DisasmError> {
        let mut cursor = 0;
        while cursor < body.len() {
            let used = self.step(session, record, &body[cursor..], out, summary)?;
            cursor += used;
            summary.units += 1;
            summary.bytes_decoded += used;
        }
        Ok(())
    }

    /// Decode one unit at the start of `rest`, emit its lines and return the
    /// number of bytes it used.
    fn step<E: Emitter>(
        &self,
        session: &mut DecodeSession,
        record: usize,
        rest: &[u8],
        out: &mut E,
        summary: &mut RunSummary,
    ) -> Result<usize, DisasmError> {
        let addr = session.pc;
        let label = self.tables.symbols.get(addr).unwrap_or("");

        match classify(addr, rest, &self.tables.literals, &self.dec) {
            Ok(Unit::Data(lit)) => {
                let n = lit.byte_len();
                let pool = lit.is_pool_literal();
                if session.enter_pool(pool) {
                    out.emit(ListingLine::directive("LTORG", ""))?;
                }
                session.advance(n);
                let kind = if pool { "*" } else { "BYTE" };
                let name = if lit.name.is_empty() { label } else { lit.name.as_str() };
                out.emit(ListingLine::new(addr, name, kind, lit.text.clone()).with_object(fmt_bytes(&rest[..n])))?;
                Ok(n)
            }
            Ok(Unit::Instr(d)) => {
                session.enter_pool(false);
                let w = d.width();
                session.advance(w);
                let r = resolve(session, &self.tables, &d);
                out.emit(ListingLine::new(addr, label, r.mnemonic, r.operand).with_object(fmt_bytes(&rest[..w])))?;
                if let Some(base) = r.base_directive {
                    out.emit(ListingLine::directive("BASE", base))?;
                }
                Ok(w)
            }
            Err(DecodeError::UnknownOpcode { byte }) => {
                // keep going one byte further on; the byte is kept as data
                warn!("no opcode for {byte:02X} at {addr:06X}, emitting it as a byte constant");
                session.enter_pool(false);
                session.advance(1);
                summary.unknown += 1;
                out.emit(ListingLine::new(addr, label, "BYTE", format!("X'{byte:02X}'")).with_object(fmt_bytes(&rest[..1])))?;
                Ok(1)
            }
            Err(source) => Err(DisasmError::Decode { record, addr, source }),
        }
    }

    fn reserve<E: Emitter>(
        &self,
        session: &mut DecodeSession,
        bound: u32,
        out: &mut E,
        summary: &mut RunSummary,
    ) -> Result<(), DisasmError> {
        for r in synthesize(session.pc, bound, &self.tables.symbols) {
            out.emit(ListingLine::new(r.addr, &r.name, "RESB", r.bytes.to_string()))?;
            session.advance(r.bytes as usize);
            summary.reserved += 1;
            summary.reserved_bytes += r.bytes;
        }
        Ok(())
    }
}
