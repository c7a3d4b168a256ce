//! SQL DDL generation for a set of tables.
//!
//! A [`SchemaGenerator`] runs `Start → SchemaEmitted → TableEmitted* → Done`.
//! The database statement is written once, before the first table; each table
//! contributes one `CREATE TABLE` statement and, for PostgreSQL, one
//! `COMMENT ON COLUMN` statement per labelled column.
//!
//! Identifiers are wrapped in the dialect quote but embedded quote characters
//! are not escaped. Labels are inserted between single quotes verbatim.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{info, warn};

use crate::{
    classify::classify,
    dialect::{DialectKind, DialectProfile},
    error::{ExportError, Result},
    metadata::{ColumnDescriptor, TableCatalog},
    source::{list_catalogs, table_name},
};

pub const ENGINE_INNODB: &str = "InnoDB";
pub const CHARSET_LATIN1: &str = "latin1";
pub const COLLATION_LATIN1_BIN: &str = "latin1_bin";

const LINE_SEPARATOR: &str = "\n";
const STATEMENT_END: &str = ";\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    pub schema: String,
    pub engine: String,
    pub charset: String,
    pub collation: String,
}

impl SchemaOptions {
    /// Options with the default engine, charset and collation.
    pub fn new(schema: &str) -> Result<Self> {
        let schema = schema.trim();
        if schema.is_empty() {
            return Err(ExportError::MissingSchemaName);
        }
        Ok(Self {
            schema: schema.to_string(),
            engine: ENGINE_INNODB.to_string(),
            charset: CHARSET_LATIN1.to_string(),
            collation: COLLATION_LATIN1_BIN.to_string(),
        })
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = collation.into();
        self
    }
}

/// `CREATE DATABASE` (and `USE` for MySQL).
pub fn create_schema_statement(dialect: &DialectProfile, options: &SchemaOptions) -> String {
    let schema = dialect.quote_identifier(&options.schema);
    match dialect.kind {
        DialectKind::MySql => {
            format!("CREATE DATABASE {schema}{STATEMENT_END}USE {schema}{STATEMENT_END}")
        }
        DialectKind::PostgreSql => format!(
            "CREATE DATABASE {schema} WITH LC_COLLATE {} LC_CHARSET {}{STATEMENT_END}",
            options.collation, options.charset
        ),
    }
}

fn column_clause(dialect: &DialectProfile, column: &ColumnDescriptor) -> String {
    let mut clause = format!(
        " {} {} NULL DEFAULT NULL",
        dialect.quote_identifier(&column.name),
        classify(column, dialect)
    );
    if dialect.kind == DialectKind::MySql {
        if let Some(label) = column.label_text() {
            clause.push_str(&format!(" COMMENT '{label}'"));
        }
    }
    clause
}

/// `CREATE TABLE` for one table, followed by PostgreSQL column comments.
pub fn create_table_statement(
    dialect: &DialectProfile,
    options: &SchemaOptions,
    table: &str,
    columns: &[ColumnDescriptor],
) -> String {
    let quoted_table = dialect.quote_identifier(table);
    let clauses = columns
        .iter()
        .map(|column| column_clause(dialect, column))
        .join(&format!(",{LINE_SEPARATOR}"));
    match dialect.kind {
        DialectKind::MySql => format!(
            "CREATE TABLE IF NOT EXISTS {quoted_table} ({LINE_SEPARATOR}{clauses}) ENGINE='{}' CHARACTER SET {} COLLATE {}{STATEMENT_END}",
            options.engine, options.charset, options.collation
        ),
        DialectKind::PostgreSql => {
            let mut statement =
                format!("CREATE TABLE {quoted_table} ({LINE_SEPARATOR}{clauses}){STATEMENT_END}");
            let schema = dialect.quote_identifier(&options.schema);
            for column in columns {
                if let Some(label) = column.label_text() {
                    statement.push_str(&format!(
                        "COMMENT ON COLUMN {schema}.{quoted_table}.{} IS '{label}'{STATEMENT_END}",
                        dialect.quote_identifier(&column.name)
                    ));
                }
            }
            statement
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Start,
    SchemaEmitted,
    TableEmitted,
    Done,
}

/// Outcome of scanning a folder of catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub tables: Vec<String>,
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct SchemaGenerator {
    dialect: DialectProfile,
    options: SchemaOptions,
    state: GeneratorState,
    script: String,
}

impl SchemaGenerator {
    pub fn new(dialect: DialectProfile, options: SchemaOptions) -> Self {
        Self {
            dialect,
            options,
            state: GeneratorState::Start,
            script: String::new(),
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    /// Emits the database statement. Only the first call writes anything.
    pub fn emit_schema(&mut self) {
        if self.state == GeneratorState::Start {
            self.script
                .push_str(&create_schema_statement(&self.dialect, &self.options));
            self.state = GeneratorState::SchemaEmitted;
        }
    }

    /// Appends one table definition. Ignored once the generator is done.
    pub fn add_table(&mut self, table: &str, columns: &[ColumnDescriptor]) {
        if self.state == GeneratorState::Done {
            warn!("Ignoring table '{table}' added after the script was finished");
            return;
        }
        self.emit_schema();
        self.script.push_str(&create_table_statement(
            &self.dialect,
            &self.options,
            table,
            columns,
        ));
        self.state = GeneratorState::TableEmitted;
    }

    /// Adds every `(table name, columns)` pair in order.
    pub fn add_tables<I, S>(&mut self, tables: I) -> usize
    where
        I: IntoIterator<Item = (S, Vec<ColumnDescriptor>)>,
        S: AsRef<str>,
    {
        let mut added = 0usize;
        if self.state == GeneratorState::Done {
            return added;
        }
        for (table, columns) in tables {
            self.add_table(table.as_ref(), &columns);
            added += 1;
        }
        added
    }

    /// Adds one table per catalog file in `folder`.
    ///
    /// A catalog that cannot be loaded is logged and skipped. A folder that
    /// cannot be listed is an error.
    pub fn add_folder(&mut self, folder: &Path) -> Result<FolderSummary> {
        let mut summary = FolderSummary::default();
        if self.state == GeneratorState::Done {
            return Ok(summary);
        }
        self.emit_schema();
        for path in list_catalogs(folder)? {
            let name = table_name(&path);
            info!("Processing: {name}");
            match TableCatalog::load(&path) {
                Ok(catalog) => {
                    self.add_table(&name, &catalog.columns);
                    summary.tables.push(name);
                }
                Err(err) => {
                    warn!("Skipping table '{name}': {err}");
                    summary.skipped.push(path);
                }
            }
        }
        Ok(summary)
    }

    /// Completes the run and hands over the script. Later calls return nothing.
    pub fn finish(&mut self) -> String {
        if self.state == GeneratorState::Done {
            return String::new();
        }
        self.emit_schema();
        self.state = GeneratorState::Done;
        std::mem::take(&mut self.script)
    }
}
