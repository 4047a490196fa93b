use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sicxe_rs::hex::{fmt_addr6, fmt_bytes};
use sicxe_rs::listing::render;
use sicxe_rs::{ListingLine, ObjectRecord, RunSummary};
use sicxe_disasm::load_program;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "SIC/XE disassembler CLI", long_about=None)]
struct Cli {
    /// Object file (H/T/M/E records)
    #[arg(value_name = "OBJFILE")]
    object: PathBuf,
    /// Symbol/literal cross-reference report
    #[arg(value_name = "SYMFILE")]
    report: PathBuf,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the parsed object records
    Records,
    /// Dump the symbol and literal tables
    Tables,
    /// Reconstruct the source listing
    Listing {
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the listing to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Clone, serde::Serialize)]
struct ListingReport<'a> {
    program: &'a str,
    lines: &'a [ListingLine],
    summary: &'a RunSummary,
}

fn fmt_record(rec: &ObjectRecord) -> String {
    match rec {
        ObjectRecord::Header { name, start, length } => {
            format!("H  {name:<8} start {} length {}", fmt_addr6(*start), fmt_addr6(*length))
        }
        ObjectRecord::Text { start, declared_len, body } => {
            format!("T  {} len {:02X} {}", fmt_addr6(*start), declared_len, fmt_bytes(body))
        }
        ObjectRecord::Modification => "M".to_string(),
        ObjectRecord::End { first: Some(f) } => format!("E  {}", fmt_addr6(*f)),
        ObjectRecord::End { first: None } => "E".to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let prog = load_program(&cli.object, &cli.report)?;

    match cli.cmd {
        Command::Records => {
            for rec in &prog.object.records {
                println!("{}", fmt_record(rec));
            }
        }
        Command::Tables => {
            println!("{:<10} {:<8}", "symbol", "address");
            for (addr, name) in prog.tables.symbols.iter() {
                println!("{name:<10} {}", fmt_addr6(addr));
            }
            println!();
            println!("{:<10} {:<12} {:<6} {:<8}", "name", "literal", "length", "address");
            for (addr, lit) in prog.tables.literals.iter() {
                println!("{:<10} {:<12} {:<6} {}", lit.name, lit.text, lit.len, fmt_addr6(addr));
            }
        }
        Command::Listing { format, out } => {
            let (lines, summary) = prog.listing()?;
            let text = match format {
                OutputFormat::Text => render(&lines),
                OutputFormat::Json => {
                    let report = ListingReport { program: &prog.object.name, lines: &lines, summary: &summary };
                    serde_json::to_string_pretty(&report)? + "\n"
                }
            };
            if let Some(path) = out { std::fs::write(path, text)?; } else { print!("{}", text); }
        }
    }

    Ok(())
}
