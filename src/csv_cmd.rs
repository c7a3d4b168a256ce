use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::CsvArgs,
    csv_writer::{CsvRowWriter, DEFAULT_TERMINATOR},
    dialect::DialectProfile,
    io_utils,
    metadata::{ColumnDescriptor, write_metadata},
    source::{StagedTable, TableSource},
};

const CRLF: &str = "\r\n";

pub fn execute(args: &CsvArgs) -> Result<()> {
    let dialect = args
        .dialect
        .as_deref()
        .map(str::parse::<DialectProfile>)
        .transpose()?;
    let delimiter = args.delimiter.unwrap_or(io_utils::DEFAULT_CSV_DELIMITER);
    let terminator = if args.crlf { CRLF } else { DEFAULT_TERMINATOR };

    let mut table = StagedTable::open(&args.input)
        .with_context(|| format!("Opening table catalog {:?}", args.input))?;

    if args.metadata {
        print_metadata(&args.input.display().to_string(), table.columns())?;
    }

    info!(
        "Exporting '{}' -> {} (dialect {}, delimiter '{}')",
        table.name(),
        io_utils::describe_output(args.output.as_deref()),
        dialect.map(|d| d.name).unwrap_or("none"),
        io_utils::printable_delimiter(delimiter)
    );

    let sink = io_utils::open_output(args.output.as_deref())?;
    let mut writer = CsvRowWriter::new(sink)
        .with_delimiter(delimiter)
        .with_terminator(terminator)
        .with_dialect(dialect);
    let rows = writer
        .export(&mut table, !args.no_header)
        .with_context(|| format!("Exporting rows of {:?}", args.input))?;
    writer.finish().context("Flushing CSV output")?;

    info!(
        "CSV successfully written to: {} ({rows} row(s))",
        io_utils::describe_output(args.output.as_deref())
    );
    Ok(())
}

fn print_metadata(name: &str, columns: &[ColumnDescriptor]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Metadata for {name}:")?;
    write_metadata(&mut out, columns).context("Writing column metadata")?;
    writeln!(out, "-----------------")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
