use tracing::warn;

use crate::decoder::{Decoded, Format, Nixbpe};
use crate::opcodes::{OpKind, RegShape};
use crate::session::DecodeSession;

/// Mnemonic column text; format 4 gets a `+`.
pub fn fmt_mnemonic(d: &Decoded) -> String {
    match d.format {
        Format::F4 => format!("+{}", d.op.mnemonic),
        _ => d.op.mnemonic.to_string(),
    }
}

fn reg(code: u8) -> String {
    match DecodeSession::register_name(code) {
        Some(name) => name.to_string(),
        None => {
            warn!(code, "register code outside the register table");
            code.to_string()
        }
    }
}

/// Operand text of a format-2 instruction.
pub fn fmt_registers(d: &Decoded) -> String {
    match d.op.kind {
        OpKind::Reg(RegShape::R1) => reg(d.r1),
        OpKind::Reg(RegShape::R1R2) => format!("{},{}", reg(d.r1), reg(d.r2)),
        OpKind::Reg(RegShape::R1N) => format!("{},{}", reg(d.r1), d.r2 + 1),
        OpKind::Reg(RegShape::N) => d.r1.to_string(),
        OpKind::Mem | OpKind::Bare => reg(d.r1),
    }
}

/// Apply the indexed suffix and the indirect/immediate prefix to a resolved
/// operand. Indexed operands are cut at their first whitespace.
pub fn fmt_operand(flags: Nixbpe, operand: &str) -> String {
    let mut out = String::new();
    if flags.is_indirect() {
        out.push('@');
    } else if flags.is_immediate() {
        out.push('#');
    }
    if flags.contains(Nixbpe::X) {
        let cut = operand.find(char::is_whitespace).unwrap_or(operand.len());
        out.push_str(&operand[..cut]);
        out.push_str(",X");
    } else {
        out.push_str(operand);
    }
    out
}
