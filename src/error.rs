//! Error taxonomy for the export engine.
//!
//! Pure formatting never fails. Everything that can go wrong is either a
//! configuration problem (raised before any output is produced), a sink or
//! source I/O failure, or a catalog that cannot be listed or opened.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// No dialect name was supplied.
    #[error("No database dialect given")]
    MissingDialect,

    /// The dialect name is not one of the built-in profiles.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// The schema name is required for DDL generation.
    #[error("Schema name must not be blank")]
    MissingSchemaName,

    /// Writing to or flushing the output sink failed.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A source catalog could not be listed, opened or parsed.
    #[error("Catalog failure for {path:?}: {message}")]
    CatalogIo { path: PathBuf, message: String },

    /// A staged row or cell could not be turned into a typed value.
    #[error("Source failure at row {row}: {message}")]
    Source { row: usize, message: String },
}

impl ExportError {
    pub fn catalog(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ExportError::CatalogIo {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn source(row: usize, message: impl Into<String>) -> Self {
        ExportError::Source {
            row,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
