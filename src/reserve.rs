use serde::Serialize;

use crate::tables::SymbolTable;

/// A RESB block recovered from a gap in the text records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub addr: u32,
    pub name: String,
    pub bytes: u32,
}

/// Every symbol in `[pc, bound)` owns the bytes up to the next such symbol,
/// the last one up to `bound`.
pub fn synthesize(pc: u32, bound: u32, symbols: &SymbolTable) -> Vec<Reservation> {
    if bound <= pc {
        return Vec::new();
    }
    let inside: Vec<(u32, &str)> = symbols.in_range(pc..bound).collect();
    inside
        .iter()
        .enumerate()
        .map(|(i, &(addr, name))| {
            let end = inside.get(i + 1).map_or(bound, |&(next, _)| next);
            Reservation { addr, name: name.to_string(), bytes: end - addr }
        })
        .collect()
}
