use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::opcodes::OpDesc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    F2 = 2,
    F3 = 3,
    F4 = 4,
}

impl Format {
    pub fn width(self) -> usize {
        self as usize
    }
}

bitflags! {
/// Addressing flags, in the order they sit after the six opcode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nixbpe: u8 {
const N = 1 << 5; // indirect
const I = 1 << 4; // immediate
const X = 1 << 3; // indexed
const B = 1 << 2; // base-relative
const P = 1 << 1; // pc-relative
const E = 1 << 0; // extended (format 4)
}
}

impl Nixbpe {
    pub fn is_indirect(self) -> bool {
        self.contains(Nixbpe::N) && !self.contains(Nixbpe::I)
    }

    pub fn is_immediate(self) -> bool {
        self.contains(Nixbpe::I) && !self.contains(Nixbpe::N)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Decoded {
    pub op: OpDesc,
    pub format: Format,
    /// Zero for format 2.
    pub flags: Nixbpe,
    /// Raw displacement/address field: 12 bits (F3) or 20 bits (F4).
    pub field: u32,
    /// Register nibbles, format 2 only.
    pub r1: u8,
    pub r2: u8,
}

impl Decoded {
    pub fn width(&self) -> usize {
        self.format.width()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no opcode matches byte {byte:#04x}")]
    UnknownOpcode { byte: u8 },
    #[error("unit needs {need} bytes but only {have} remain in the record")]
    Truncated { need: usize, have: usize },
    #[error("literal length of {len} hex digits is not a whole, non-zero byte count")]
    BadLiteralLength { len: usize },
}

pub trait Decoder {
    /// Decode the instruction at the start of `bytes`.
    fn decode(&self, bytes: &[u8]) -> Result<Decoded, DecodeError>;
}
