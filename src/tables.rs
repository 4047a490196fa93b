use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

/// Address -> symbol name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    entries: BTreeMap<u32, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later definitions at the same address replace earlier ones.
    pub fn insert(&mut self, addr: u32, name: impl Into<String>) {
        let name = name.into();
        if let Some(old) = self.entries.insert(addr, name.clone()) {
            debug!("symbol at {addr:06X} redefined: {old} -> {name}");
        }
    }

    pub fn get(&self, addr: u32) -> Option<&str> {
        self.entries.get(&addr).map(String::as_str)
    }

    /// Symbols with addresses in `range`, ascending.
    pub fn in_range(&self, range: Range<u32>) -> impl Iterator<Item = (u32, &str)> {
        self.entries.range(range).map(|(a, n)| (*a, n.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(a, n)| (*a, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    /// Empty for anonymous literals.
    pub name: String,
    /// Source text, e.g. `=C'EOF'` or `X'05'`.
    pub text: String,
    /// Length in hex digits.
    pub len: usize,
}

impl Literal {
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// True pool literals start with `=`; anything else is a BYTE constant.
    pub fn is_pool_literal(&self) -> bool {
        self.text.starts_with('=')
    }

    pub fn byte_len(&self) -> usize {
        self.len / 2
    }
}

/// Address -> literal description.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LiteralTable {
    entries: BTreeMap<u32, Literal>,
}

impl LiteralTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, addr: u32, lit: Literal) {
        if self.entries.insert(addr, lit).is_some() {
            debug!("literal at {addr:06X} redefined");
        }
    }

    pub fn get(&self, addr: u32) -> Option<&Literal> {
        self.entries.get(&addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Literal)> {
        self.entries.iter().map(|(a, l)| (*a, l))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both cross-reference tables, read-only while decoding.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tables {
    pub symbols: SymbolTable,
    pub literals: LiteralTable,
}
