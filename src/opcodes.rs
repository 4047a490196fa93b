use std::collections::HashMap;

use serde::Serialize;

/// How a format-2 instruction packs its register byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegShape {
    /// r1 only (CLEAR, TIXR)
    R1,
    /// r1,r2
    R1R2,
    /// r1,n where n is stored as n-1 (SHIFTL, SHIFTR)
    R1N,
    /// n in the r1 nibble (SVC)
    N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpKind {
    /// Two-byte register instruction.
    Reg(RegShape),
    /// Three/four-byte memory instruction.
    Mem,
    /// One-byte instruction; decoded through the memory path like the rest.
    Bare,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OpDesc {
    pub mnemonic: &'static str,
    /// Opcode with both flag bits clear.
    pub opcode: u8,
    pub kind: OpKind,
}

impl OpDesc {
    pub fn is_format2(&self) -> bool {
        matches!(self.kind, OpKind::Reg(_))
    }
}

const fn mem(mnemonic: &'static str, opcode: u8) -> OpDesc {
    OpDesc { mnemonic, opcode, kind: OpKind::Mem }
}

const fn reg(mnemonic: &'static str, opcode: u8, shape: RegShape) -> OpDesc {
    OpDesc { mnemonic, opcode, kind: OpKind::Reg(shape) }
}

const fn bare(mnemonic: &'static str, opcode: u8) -> OpDesc {
    OpDesc { mnemonic, opcode, kind: OpKind::Bare }
}

pub const OPCODE_COUNT: usize = 59;

pub const TABLE: [OpDesc; OPCODE_COUNT] = [
    mem("ADD", 0x18),
    mem("ADDF", 0x58),
    reg("ADDR", 0x90, RegShape::R1R2),
    mem("AND", 0x40),
    reg("CLEAR", 0xB4, RegShape::R1),
    mem("COMP", 0x28),
    mem("COMPF", 0x88),
    reg("COMPR", 0xA0, RegShape::R1R2),
    mem("DIV", 0x24),
    mem("DIVF", 0x64),
    reg("DIVR", 0x9C, RegShape::R1R2),
    bare("FIX", 0xC4),
    bare("FLOAT", 0xC0),
    bare("HIO", 0xF4),
    mem("J", 0x3C),
    mem("JEQ", 0x30),
    mem("JGT", 0x34),
    mem("JLT", 0x38),
    mem("JSUB", 0x48),
    mem("LDA", 0x00),
    mem("LDB", 0x68),
    mem("LDCH", 0x50),
    mem("LDF", 0x70),
    mem("LDL", 0x08),
    mem("LDS", 0x6C),
    mem("LDT", 0x74),
    mem("LDX", 0x04),
    mem("LPS", 0xD0),
    mem("MUL", 0x20),
    mem("MULF", 0x60),
    reg("MULR", 0x98, RegShape::R1R2),
    bare("NORM", 0xC8),
    mem("OR", 0x44),
    mem("RD", 0xD8),
    reg("RMO", 0xAC, RegShape::R1R2),
    mem("RSUB", 0x4C),
    reg("SHIFTL", 0xA4, RegShape::R1N),
    reg("SHIFTR", 0xA8, RegShape::R1N),
    bare("SIO", 0xF0),
    mem("SSK", 0xEC),
    mem("STA", 0x0C),
    mem("STB", 0x78),
    mem("STCH", 0x54),
    mem("STF", 0x80),
    mem("STI", 0xD4),
    mem("STL", 0x14),
    mem("STS", 0x7C),
    mem("STSW", 0xE8),
    mem("STT", 0x84),
    mem("STX", 0x10),
    mem("SUB", 0x1C),
    mem("SUBF", 0x5C),
    reg("SUBR", 0x94, RegShape::R1R2),
    reg("SVC", 0xB0, RegShape::N),
    mem("TD", 0xE0),
    bare("TIO", 0xF8),
    mem("TIX", 0x2C),
    reg("TIXR", 0xB8, RegShape::R1),
    mem("WD", 0xDC),
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OpcodeTableError {
    #[error("opcode table needs exactly {expected} entries, got {got}")]
    Count { expected: usize, got: usize },
    #[error("opcode {opcode:#04x} ({mnemonic}) has flag bits set")]
    FlagBits { mnemonic: &'static str, opcode: u8 },
    #[error("opcode {opcode:#04x} is listed twice ({first}, {second})")]
    Duplicate { opcode: u8, first: &'static str, second: &'static str },
}

/// Opcode lookups keyed two ways: by the exact first byte (used to spot
/// two-byte register instructions) and by the first byte with its n/i bits
/// masked off (used for three/four-byte instructions, whose flags vary).
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    exact: HashMap<u8, OpDesc>,
    masked: HashMap<u8, OpDesc>,
}

impl OpcodeTable {
    pub fn new() -> Self {
        // TABLE is a checked constant; the builder only fails on bad input
        Self::from_descs(&TABLE).unwrap_or_else(|e| unreachable!("builtin opcode table: {e}"))
    }

    pub fn from_descs(descs: &[OpDesc]) -> Result<Self, OpcodeTableError> {
        if descs.len() != OPCODE_COUNT {
            return Err(OpcodeTableError::Count { expected: OPCODE_COUNT, got: descs.len() });
        }
        let mut exact = HashMap::with_capacity(descs.len());
        let mut masked = HashMap::with_capacity(descs.len());
        for d in descs {
            if d.opcode & 0x03 != 0 {
                return Err(OpcodeTableError::FlagBits { mnemonic: d.mnemonic, opcode: d.opcode });
            }
            if let Some(prev) = exact.insert(d.opcode, *d) {
                return Err(OpcodeTableError::Duplicate {
                    opcode: d.opcode,
                    first: prev.mnemonic,
                    second: d.mnemonic,
                });
            }
            masked.insert(d.opcode & 0xFC, *d);
        }
        Ok(Self { exact, masked })
    }

    /// Entry whose full 8-bit pattern equals `byte`.
    pub fn lookup_exact(&self, byte: u8) -> Option<&OpDesc> {
        self.exact.get(&byte)
    }

    /// Entry for `byte` once its two flag bits are cleared.
    pub fn lookup_masked(&self, byte: u8) -> Option<&OpDesc> {
        self.masked.get(&(byte & 0xFC))
    }

    pub fn by_mnemonic(&self, mnemonic: &str) -> Option<&OpDesc> {
        self.exact.values().find(|d| d.mnemonic == mnemonic)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_complete() {
        let t = OpcodeTable::new();
        assert_eq!(t.len(), 59);
        assert_eq!(t.lookup_exact(0xB4).unwrap().mnemonic, "CLEAR");
        // ADD with n=i=1 is found only through the masked path
        assert!(t.lookup_exact(0x1B).is_none());
        assert_eq!(t.lookup_masked(0x1B).unwrap().mnemonic, "ADD");
        assert_eq!(t.lookup_masked(0x69).unwrap().mnemonic, "LDB");
        assert_eq!(t.by_mnemonic("LDX").unwrap().opcode, 0x04);
    }

    #[test]
    fn unused_opcodes_miss() {
        let t = OpcodeTable::new();
        assert!(t.lookup_masked(0xFC).is_none());
        assert!(t.lookup_exact(0x8C).is_none());
    }

    #[test]
    fn rejects_short_or_bad_tables() {
        assert_eq!(
            OpcodeTable::from_descs(&TABLE[..58]).unwrap_err(),
            OpcodeTableError::Count { expected: 59, got: 58 }
        );
        let mut bad = TABLE;
        bad[0] = mem("ADD", 0x19);
        assert!(matches!(OpcodeTable::from_descs(&bad), Err(OpcodeTableError::FlagBits { .. })));
        let mut dup = TABLE;
        dup[1] = mem("ADDF", 0x18);
        assert!(matches!(OpcodeTable::from_descs(&dup), Err(OpcodeTableError::Duplicate { .. })));
    }
}
