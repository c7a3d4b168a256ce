pub mod classify;
pub mod cli;
pub mod csv_cmd;
pub mod csv_writer;
pub mod data;
pub mod dialect;
pub mod error;
pub mod format;
pub mod io_utils;
pub mod metadata;
pub mod schema;
pub mod schema_cmd;
pub mod source;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

pub use crate::{
    csv_writer::CsvRowWriter,
    data::{CellValue, Row},
    dialect::{DialectProfile, MYSQL, POSTGRESQL},
    error::ExportError,
    metadata::{ColumnDescriptor, SemanticType, TableCatalog},
    schema::{SchemaGenerator, SchemaOptions},
    source::{MemoryTable, StagedTable, TableSource},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sas_export", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Csv(args) => csv_cmd::execute(&args),
        Commands::Schema(args) => schema_cmd::execute(&args),
        Commands::Metadata(args) => handle_metadata(&args),
    }
}

fn handle_metadata(args: &cli::MetadataArgs) -> Result<()> {
    let catalog = TableCatalog::load(&args.input)
        .with_context(|| format!("Loading table catalog {:?}", args.input))?;
    let sink = io_utils::open_output(args.output.as_deref())?;
    metadata::write_metadata(sink, &catalog.columns)
        .with_context(|| format!("Writing metadata for {:?}", args.input))?;
    info!(
        "Described {} column(s) of '{}'",
        catalog.columns.len(),
        source::table_name(&args.input)
    );
    Ok(())
}
