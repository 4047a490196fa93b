use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use sicxe_rs::input::read_inputs;
use sicxe_rs::{parse_object, parse_report, Disassembler, ListingLine, ObjectFile, RunSummary, Tables};

/// Both inputs of a run, parsed.
#[derive(Debug, Clone)]
pub struct Program {
    pub object: ObjectFile,
    pub tables: Tables,
}

impl Program {
    pub fn parse(object: &str, report: &str) -> Result<Self> {
        let object = parse_object(object).context("parsing object file")?;
        let tables = parse_report(report).context("parsing symbol report")?;
        Ok(Self { object, tables })
    }

    pub fn listing(&self) -> Result<(Vec<ListingLine>, RunSummary)> {
        let mut lines = Vec::new();
        let summary = Disassembler::new(self.tables.clone()).run(&self.object, &mut lines)?;
        Ok((lines, summary))
    }
}

pub fn load_program(object: &Path, report: &Path) -> Result<Program> {
    let inputs = read_inputs(object, report)?;
    debug!(object = %object.display(), report = %report.display(), "inputs read");
    Program::parse(&inputs.object, &inputs.report)
        .with_context(|| format!("loading {} with {}", object.display(), report.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_from_disk() {
        let dir = std::env::temp_dir().join(format!("sicxe-disasm-model-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let obj = dir.join("prog.obj");
        let sym = dir.join("prog.sym");
        std::fs::write(&obj, "HP000000000003\nT00000003172000\nE000000\n").unwrap();
        std::fs::write(&sym, "Symbol Value\nHERE 000003\n").unwrap();
        let loaded = load_program(&obj, &sym);
        let _ = std::fs::remove_dir_all(&dir);
        let prog = loaded.unwrap();
        assert_eq!(prog.object.name, "P");
        assert_eq!(prog.tables.symbols.get(3), Some("HERE"));
        let (lines, summary) = prog.listing().unwrap();
        assert_eq!(lines[1].to_string(), "0000\t\tSTL\tHERE\t172000");
        assert_eq!(summary.final_pc, 3);
    }

    #[test]
    fn missing_report_aborts() {
        let dir = std::env::temp_dir().join("sicxe-disasm-absent");
        let err = load_program(&dir.join("absent.obj"), &dir.join("absent.sym")).unwrap_err();
        assert!(err.to_string().contains("absent.obj"));
    }
}
