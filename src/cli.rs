use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{dialect::DIALECT_MYSQL, schema};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Export statistical dataset tables to database-ready CSV and SQL DDL",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export one table to CSV for bulk loading
    Csv(CsvArgs),
    /// Generate a SQL DDL script for every table catalog in a folder
    Schema(SchemaArgs),
    /// Print the column catalog of one table as CSV
    Metadata(MetadataArgs),
}

#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Table catalog (.yaml) describing the columns and pointing at the data
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted or '-')
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Target database dialect ('MySQL' or 'PostgreSQL'); plain CSV if omitted
    #[arg(short = 'd', long = "dialect")]
    pub dialect: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Terminate rows with CRLF instead of LF
    #[arg(long)]
    pub crlf: bool,
    /// Do not write the header row
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Print the column catalog to stdout before exporting
    #[arg(long)]
    pub metadata: bool,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Folder containing the table catalogs (.yaml / .yml)
    #[arg(short = 'f', long = "folder")]
    pub folder: PathBuf,
    /// Output SQL script file (stdout if '-')
    #[arg(short = 'q', long = "sql-file")]
    pub sql_file: PathBuf,
    /// Name of the database schema to create
    #[arg(short = 's', long = "schema")]
    pub schema: String,
    /// 'MySQL' (default) or 'PostgreSQL'
    #[arg(short = 'd', long = "dialect", default_value = DIALECT_MYSQL)]
    pub dialect: String,
    /// Storage engine (MySQL only)
    #[arg(short = 'e', long = "engine", default_value = schema::ENGINE_INNODB)]
    pub engine: String,
    /// Character set of the database
    #[arg(long = "charset", default_value = schema::CHARSET_LATIN1)]
    pub charset: String,
    /// Collation of the database
    #[arg(short = 'c', long = "collation", default_value = schema::COLLATION_LATIN1_BIN)]
    pub collation: String,
}

#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Table catalog (.yaml) to describe
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted or '-')
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() || first == '"' {
                return Err("Delimiter must be an ASCII character other than '\"'".to_string());
            }
            Ok(first as u8)
        }
    }
}
