use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sicxe_rs::input::read_inputs;
use sicxe_rs::{parse_object, parse_report, Disassembler, WriteEmitter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Disassemble a SIC/XE object file into a source listing"
)]
struct Opts {
    /// Object file (H/T/M/E records)
    #[arg(value_name = "OBJFILE")]
    object: PathBuf,
    /// Symbol/literal cross-reference report from the assembler
    #[arg(value_name = "SYMFILE")]
    report: PathBuf,
    /// Listing output path
    #[arg(short, long, default_value = "out.lst")]
    output: PathBuf,
    /// Append to the output instead of replacing it
    #[arg(long)]
    append: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    // both inputs are read before the listing file is touched
    let inputs = read_inputs(&opts.object, &opts.report)?;
    let obj = parse_object(&inputs.object).with_context(|| format!("parsing {}", opts.object.display()))?;
    let tables = parse_report(&inputs.report).with_context(|| format!("parsing {}", opts.report.display()))?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(opts.append)
        .truncate(!opts.append)
        .open(&opts.output)
        .with_context(|| format!("opening {}", opts.output.display()))?;
    let mut out = WriteEmitter::new(BufWriter::new(file));

    let summary = Disassembler::new(tables).run(&obj, &mut out)?;
    out.into_inner().flush()?;

    info!(
        units = summary.units,
        unknown = summary.unknown,
        reserved = summary.reserved,
        "wrote {}",
        opts.output.display()
    );
    Ok(())
}
