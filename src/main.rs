//!
//! resizable_record - layout inspector
//!
//! Loads a JSON record schema and prints where every field lands for the
//! given array lengths:
//!
//!   resizable_record schema.json first=2 second=4
//!
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::debug;

use resizable_record::{RecordLayout, SchemaConfig};

#[derive(Parser)]
#[command(name = "resizable_record")]
#[command(version, about = "Print the memory layout of a resizable record schema", long_about = None)]
struct Cli {
    /// JSON schema file
    schema: PathBuf,

    /// Array lengths as name=count; arrays not listed have length 0
    #[arg(value_parser = parse_length)]
    lengths: Vec<(String, usize)>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn parse_length(arg: &str) -> Result<(String, usize), String> {
    let (name, count) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=count, got {arg}"))?;
    let count = count
        .parse()
        .map_err(|e| format!("bad count for {name}: {e}"))?;
    Ok((name.to_string(), count))
}

#[derive(Serialize)]
struct FieldRow<'a> {
    name: &'a str,
    variable: bool,
    count: usize,
    offset: usize,
    size: usize,
    align: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    overall_align: usize,
    total_size: usize,
    fields: Vec<FieldRow<'a>>,
}

fn report<'a>(layout: &'a RecordLayout, lengths: &[(String, usize)]) -> Result<Report<'a>, Box<dyn std::error::Error>> {
    let lengths = layout.lengths_from(lengths.iter().map(|(n, c)| (n.as_str(), *c)))?;
    let spans = layout.spans(&lengths)?;
    let fields = layout
        .fields()
        .iter()
        .zip(&spans)
        .zip(lengths.as_slice())
        .map(|((f, span), &count)| FieldRow {
            name: &f.name,
            variable: f.is_variable(),
            count,
            offset: span.offset,
            size: span.size,
            align: f.align,
        })
        .collect();
    Ok(Report {
        overall_align: layout.overall_align(),
        total_size: layout.calc_size(&lengths)?,
        fields,
    })
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let layout = SchemaConfig::from_path(&cli.schema)?.build()?;
    debug!(schema = %cli.schema.display(), fields = layout.field_count(), "loaded schema");

    let report = report(&layout, &cli.lengths)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:<20} {:>8} {:>8} {:>8} {:>6}", "field", "count", "offset", "size", "align");
    for row in &report.fields {
        let count = if row.variable { row.count.to_string() } else { "-".into() };
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>6}",
            row.name, count, row.offset, row.size, row.align
        );
    }
    println!("total {} bytes, aligned to {}", report.total_size, report.overall_align);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
