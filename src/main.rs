//! nvmeid - NVMe Identify data tool
//!
//! Decodes a captured Identify data buffer and either lists its fields or
//! writes a raw and annotated dump of it.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use nvmeid::formatter::{OutputFormat, create_formatter};
use nvmeid::loader::CaptureLoader;
use nvmeid::{ByteAssembly, Cns, FieldDescriptor, FieldTable, Identify};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Binary Identify capture, or a text dump written by --dump
    #[arg(value_name = "PATH")]
    input: PathBuf,

    /// Interpret the buffer as Identify Namespace data
    #[arg(long)]
    namespace: bool,

    /// Combine field bytes with the historical shift-by-position rule
    #[arg(long)]
    legacy_shift: bool,

    /// Only decode the named fields (e.g. VID, NN)
    #[arg(long, value_name = "NAME")]
    field: Vec<String>,

    /// Write a raw and annotated dump to this file instead of listing fields
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,

    /// Header text placed at the top of the dump
    #[arg(long, default_value = "")]
    header: String,

    /// Output format
    #[arg(long, short = 'f', default_value = "plain")]
    format: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let output_format: OutputFormat = args.format.parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let loader = CaptureLoader::new()?;
    let data = loader.load(&args.input)?;

    let cns = if args.namespace { Cns::Namespace } else { Cns::Controller };
    let assembly = if args.legacy_shift { ByteAssembly::LegacyBitShift } else { ByteAssembly::LittleEndian };
    let identify = Identify::new(&data).with_cns(cns).with_assembly(assembly);

    if let Some(path) = args.dump {
        identify.dump(&path, &args.header)
            .with_context(|| format!("Failed to dump Identify data to {}", path.display()))?;
        return Ok(());
    }

    let table = identify.active_table();
    let fields = select_fields(table, &args.field)?;
    display_fields(&identify, table, &fields, output_format)
}

fn select_fields(table: &'static FieldTable, names: &[String]) -> Result<Vec<(usize, &'static FieldDescriptor)>> {
    if names.is_empty() {
        return Ok(table.iter().enumerate().collect());
    }

    names.iter()
        .map(|name| {
            table.find(name)
                .with_context(|| format!("Unknown {} field: {}", table.title, name))
        })
        .collect()
}

fn display_fields(
    identify: &Identify,
    table: &FieldTable,
    fields: &[(usize, &'static FieldDescriptor)],
    output_format: OutputFormat,
) -> Result<()> {
    let mut formatter = create_formatter(output_format);
    let mut stdout = io::stdout();

    formatter.begin_document(&mut stdout, identify.cns(), identify.buffer().len())?;
    formatter.begin_fields(&mut stdout, table.title)?;

    let mut decoded = 0;
    for &(index, desc) in fields {
        let value = identify.value_at(index, table);
        if value.is_ok() {
            decoded += 1;
        }
        formatter.field(&mut stdout, desc, &value)?;
    }

    formatter.end_fields(&mut stdout)?;
    formatter.total_fields(&mut stdout, decoded, fields.len())?;
    formatter.end_document(&mut stdout)?;
    stdout.flush()?;

    Ok(())
}
