//! Operand resolution for decoded instructions.
//!
//! Resolution reads and updates the session: LDB and LDX latch their
//! displacement field into the base and index registers that later
//! base-relative and indexed operands add in, and CLEAR X drops the index
//! back to zero. Units must therefore be resolved in
//! stream order.

use serde::Serialize;
use tracing::debug;

use crate::decoder::{Decoded, Format, Nixbpe};
use crate::disasm::{fmt_mnemonic, fmt_operand, fmt_registers};
use crate::hex::strip_leading_zeros;
use crate::isa::sicxe::sign_ext;
use crate::session::DecodeSession;
use crate::tables::Tables;

/// Addresses are 24 bits wide, matching the six-digit table keys.
pub const ADDR_MASK: u32 = 0xFF_FFFF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub mnemonic: String,
    pub operand: String,
    /// Effective target of a format-3/4 operand.
    pub target: Option<u32>,
    /// Operand of the BASE directive that follows an LDB.
    pub base_directive: Option<String>,
}

/// Resolve `d`, which has already been consumed: `session.pc` must point
/// past it.
pub fn resolve(session: &mut DecodeSession, tables: &Tables, d: &Decoded) -> Resolved {
    match d.format {
        Format::F2 => resolve_registers(session, d),
        Format::F3 | Format::F4 => resolve_memory(session, tables, d),
    }
}

fn resolve_registers(session: &mut DecodeSession, d: &Decoded) -> Resolved {
    if d.op.mnemonic == "CLEAR" && DecodeSession::register_name(d.r1) == Some("X") {
        session.index = 0;
    }
    Resolved { mnemonic: fmt_mnemonic(d), operand: fmt_registers(d), target: None, base_directive: None }
}

/// The field as a value: sign-extended for format 3, unsigned for format 4.
pub fn displacement(d: &Decoded) -> u32 {
    match d.format {
        Format::F4 => d.field,
        _ => sign_ext(d.field, 12),
    }
}

/// Effective address: the displacement plus X, B and the post-instruction PC
/// as the flags select.
pub fn effective_target(session: &DecodeSession, d: &Decoded) -> u32 {
    let mut target = displacement(d);
    if d.flags.contains(Nixbpe::X) {
        target = target.wrapping_add(session.index);
    }
    if d.flags.contains(Nixbpe::B) {
        target = target.wrapping_add(session.base);
    }
    if d.flags.contains(Nixbpe::P) {
        target = target.wrapping_add(session.pc);
    }
    target & ADDR_MASK
}

/// True when the field is an absolute value that must not be looked up.
pub fn is_direct(d: &Decoded) -> bool {
    d.format != Format::F4 && !d.flags.intersects(Nixbpe::B | Nixbpe::P)
}

fn resolve_memory(session: &mut DecodeSession, tables: &Tables, d: &Decoded) -> Resolved {
    let target = effective_target(session, d);

    let bare = if is_direct(d) {
        strip_leading_zeros(&format!("{:03X}", d.field)).to_string()
    } else if let Some(sym) = tables.symbols.get(target) {
        sym.to_string()
    } else if let Some(lit) = tables.literals.get(target) {
        if lit.is_anonymous() {
            session.consume_literal(target);
            lit.text.clone()
        } else {
            lit.name.clone()
        }
    } else {
        debug!("no symbol or literal at {target:06X}");
        String::new()
    };

    let operand = fmt_operand(d.flags, &bare);
    let mut base_directive = None;
    match d.op.mnemonic {
        "LDB" => {
            session.base = displacement(d) & ADDR_MASK;
            // the directive names the operand without its addressing prefix
            base_directive = Some(fmt_operand(d.flags & Nixbpe::X, &bare));
        }
        "LDX" => session.index = displacement(d) & ADDR_MASK,
        _ => {}
    }

    Resolved { mnemonic: fmt_mnemonic(d), operand, target: Some(target), base_directive }
}
