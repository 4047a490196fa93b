use crate::decoder::{DecodeError, Decoded, Decoder};
use crate::tables::{Literal, LiteralTable};

/// What sits at the current scan position.
#[derive(Debug, Clone)]
pub enum Unit<'t> {
    /// The PC is a literal-table address: a literal or BYTE constant.
    Data(&'t Literal),
    /// A format 2, 3 or 4 instruction.
    Instr(Decoded),
}

impl Unit<'_> {
    /// Bytes this unit occupies.
    pub fn width(&self) -> usize {
        match self {
            Unit::Data(lit) => lit.byte_len(),
            Unit::Instr(d) => d.width(),
        }
    }
}

/// Classify the unit at `bytes[0]`, located at `pc`.
///
/// The literal-table check runs before any opcode inspection, so an address
/// that the report lists as a literal is never decoded as an instruction.
pub fn classify<'t, D: Decoder>(
    pc: u32,
    bytes: &[u8],
    literals: &'t LiteralTable,
    dec: &D,
) -> Result<Unit<'t>, DecodeError> {
    if let Some(lit) = literals.get(pc) {
        if lit.len == 0 || lit.len % 2 != 0 {
            return Err(DecodeError::BadLiteralLength { len: lit.len });
        }
        if lit.byte_len() > bytes.len() {
            return Err(DecodeError::Truncated { need: lit.byte_len(), have: bytes.len() });
        }
        return Ok(Unit::Data(lit));
    }
    dec.decode(bytes).map(Unit::Instr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Format;
    use crate::isa::sicxe::SicXeDecoder;

    fn lits() -> LiteralTable {
        let mut t = LiteralTable::new();
        t.insert(0x2D, Literal { name: String::new(), text: "=C'EOF'".into(), len: 6 });
        t
    }

    #[test]
    fn literal_address_wins_over_opcodes() {
        let dec = SicXeDecoder::new();
        let t = lits();
        // 454F46 would decode as a format-3 OR
        let bytes = [0x45, 0x4F, 0x46];
        assert!(matches!(classify(0x2D, &bytes, &t, &dec).unwrap(), Unit::Data(l) if l.text == "=C'EOF'"));
        assert!(matches!(classify(0x2C, &bytes, &t, &dec).unwrap(), Unit::Instr(d) if d.op.mnemonic == "OR"));
    }

    #[test]
    fn widths_follow_format() {
        let dec = SicXeDecoder::new();
        let t = LiteralTable::new();
        let cases: [(&[u8], Format); 3] = [
            (&[0xA0, 0x04], Format::F2),
            (&[0x17, 0x20, 0x2D], Format::F3),
            (&[0x4B, 0x10, 0x10, 0x36], Format::F4),
        ];
        for (bytes, fmt) in cases {
            let u = classify(0, bytes, &t, &dec).unwrap();
            assert_eq!(u.width(), fmt.width());
        }
    }

    #[test]
    fn short_literal_is_truncated() {
        let dec = SicXeDecoder::new();
        let err = classify(0x2D, &[0x45, 0x4F], &lits(), &dec).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { need: 3, have: 2 });
    }

    #[test]
    fn odd_literal_length_is_rejected() {
        let mut t = LiteralTable::new();
        t.insert(0, Literal { name: "ODD".into(), text: "X'F'".into(), len: 1 });
        let err = classify(0, &[0xF1], &t, &SicXeDecoder::new()).unwrap_err();
        assert_eq!(err, DecodeError::BadLiteralLength { len: 1 });
    }
}
