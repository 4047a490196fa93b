use std::collections::BTreeSet;

use serde::Serialize;

/// Register names indexed by their 4-bit code.
pub const REGISTERS: [&str; 7] = ["A", "X", "L", "B", "S", "T", "F"];

/// Mutable state of one disassembly run. Nothing here is shared between
/// runs; each run builds its own session from the header record.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeSession {
    /// Address of the next unit to decode. Only moves forward.
    pub pc: u32,
    /// Latched by LDB.
    pub base: u32,
    /// Latched by LDX, cleared by CLEAR X.
    pub index: u32,
    consumed_literals: BTreeSet<u32>,
    in_literal_pool: bool,
}

impl DecodeSession {
    pub fn new(start: u32) -> Self {
        Self {
            pc: start,
            base: 0,
            index: 0,
            consumed_literals: BTreeSet::new(),
            in_literal_pool: false,
        }
    }

    pub fn reset(&mut self, start: u32) {
        *self = Self::new(start);
    }

    pub fn advance(&mut self, bytes: usize) {
        self.pc = self.pc.wrapping_add(bytes as u32);
    }

    pub fn register_name(code: u8) -> Option<&'static str> {
        REGISTERS.get(code as usize).copied()
    }

    /// Record that an instruction operand resolved to an anonymous literal.
    pub fn consume_literal(&mut self, addr: u32) {
        self.consumed_literals.insert(addr);
    }

    pub fn is_consumed(&self, addr: u32) -> bool {
        self.consumed_literals.contains(&addr)
    }

    /// Mark whether the last unit was a pool literal; returns true when this
    /// call opens a new pool.
    pub fn enter_pool(&mut self, pool: bool) -> bool {
        let opened = pool && !self.in_literal_pool;
        self.in_literal_pool = pool;
        opened
    }
}
