use std::io::Write;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    cli::SchemaArgs,
    dialect::DialectProfile,
    io_utils,
    schema::{SchemaGenerator, SchemaOptions},
};

pub fn execute(args: &SchemaArgs) -> Result<()> {
    let dialect = *DialectProfile::by_name(Some(&args.dialect))?;
    let options = SchemaOptions::new(&args.schema)?
        .with_engine(args.engine.as_str())
        .with_charset(args.charset.as_str())
        .with_collation(args.collation.as_str());

    info!(
        "Generating {} schema '{}' from {:?}",
        dialect, options.schema, args.folder
    );
    let mut generator = SchemaGenerator::new(dialect, options);
    let summary = generator
        .add_folder(&args.folder)
        .with_context(|| format!("Listing table catalogs in {:?}", args.folder))?;
    let script = generator.finish();

    let mut sink = io_utils::open_output(Some(args.sql_file.as_path()))?;
    sink.write_all(script.as_bytes())
        .with_context(|| format!("Writing SQL script {:?}", args.sql_file))?;
    sink.flush()
        .with_context(|| format!("Flushing SQL script {:?}", args.sql_file))?;

    if !summary.skipped.is_empty() {
        warn!("Skipped {} table catalog(s)", summary.skipped.len());
    }
    info!(
        "Wrote {} table definition(s) to {}",
        summary.tables.len(),
        io_utils::describe_output(Some(args.sql_file.as_path()))
    );
    Ok(())
}
