use crate::decoder::{DecodeError, Decoded, Decoder, Format, Nixbpe};
use crate::opcodes::OpcodeTable;

/// Sign-extend the low `bits` of `v` to a full 32-bit two's-complement value.
#[inline]
pub fn sign_ext(v: u32, bits: u32) -> u32 {
    let s = 32 - bits;
    ((v << s) as i32 >> s) as u32
}

/// SIC/XE instruction decoder for the 2/3/4-byte encodings.
pub struct SicXeDecoder {
    ops: OpcodeTable,
}

impl SicXeDecoder {
    pub fn new() -> Self {
        Self { ops: OpcodeTable::new() }
    }

}

impl Default for SicXeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn need(bytes: &[u8], n: usize) -> Result<(), DecodeError> {
    if bytes.len() < n {
        return Err(DecodeError::Truncated { need: n, have: bytes.len() });
    }
    Ok(())
}

impl Decoder for SicXeDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Decoded, DecodeError> {
        need(bytes, 1)?;
        let op1 = bytes[0];

        // Format 2: the whole first byte is a register-instruction opcode
        if let Some(desc) = self.ops.lookup_exact(op1).filter(|d| d.is_format2()) {
            need(bytes, 2)?;
            return Ok(Decoded {
                op: *desc,
                format: Format::F2,
                flags: Nixbpe::empty(),
                field: 0,
                r1: bytes[1] >> 4,
                r2: bytes[1] & 0xF,
            });
        }

        // register instructions only exist in the 2-byte encoding
        let desc = *self
            .ops
            .lookup_masked(op1)
            .filter(|d| !d.is_format2())
            .ok_or(DecodeError::UnknownOpcode { byte: op1 })?;

        // The e bit is bit 11 from the MSB in both layouts, i.e. 0x10 of byte 1
        need(bytes, 2)?;
        let format = if bytes[1] & 0x10 != 0 { Format::F4 } else { Format::F3 };
        need(bytes, format.width())?;

        let word = bytes[..format.width()]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);
        let field_bits = (format.width() * 8 - 12) as u32;
        let hi12 = word >> field_bits;
        let flags = Nixbpe::from_bits_truncate((hi12 & 0x3F) as u8);
        let field = word & ((1u32 << field_bits) - 1);

        Ok(Decoded { op: desc, format, flags, field, r1: 0, r2: 0 })
    }
}
