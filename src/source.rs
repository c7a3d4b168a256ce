//! Input seam of the export engine.
//!
//! A [`TableSource`] yields a column catalog and a pull-based stream of rows.
//! A binary dataset decoder plugs in here; the crate itself ships
//! [`StagedTable`], which reads a YAML column catalog plus a CSV file holding
//! the raw cell text, and [`MemoryTable`] for rows already in memory.

use std::{
    collections::VecDeque,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use csv::ByteRecord;
use log::debug;

use crate::{
    data::{Row, parse_staged_value},
    error::{ExportError, Result},
    io_utils,
    metadata::{ColumnDescriptor, TableCatalog},
};

pub const CATALOG_EXTENSIONS: &[&str] = &["yaml", "yml"];

pub trait TableSource {
    fn columns(&self) -> &[ColumnDescriptor];

    /// Next row, or `None` once the source is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

/// Rows held in memory.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    columns: Vec<ColumnDescriptor>,
    rows: VecDeque<Row>,
}

impl MemoryTable {
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into(),
        }
    }
}

impl TableSource for MemoryTable {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}

pub struct StagedTable {
    name: String,
    catalog: TableCatalog,
    reader: csv::Reader<BufReader<File>>,
    record: ByteRecord,
    row_number: usize,
}

impl StagedTable {
    /// Opens the catalog at `catalog_path` and its data file.
    pub fn open(catalog_path: &Path) -> Result<Self> {
        let catalog = TableCatalog::load(catalog_path)?;
        let data_path = catalog.data_path(catalog_path);
        let file = File::open(&data_path).map_err(|err| {
            ExportError::catalog(&data_path, format!("Opening data file: {err}"))
        })?;
        let mut reader = io_utils::open_csv_reader(BufReader::new(file), b',', catalog.has_headers);
        if catalog.has_headers {
            let headers = reader.byte_headers().map_err(|err| {
                ExportError::catalog(&data_path, format!("Reading header row: {err}"))
            })?;
            if headers.len() != catalog.columns.len() {
                return Err(ExportError::catalog(
                    &data_path,
                    format!(
                        "Header has {} field(s) but the catalog lists {} column(s)",
                        headers.len(),
                        catalog.columns.len()
                    ),
                ));
            }
        }
        debug!(
            "Opened staged table {:?} with {} column(s) from {:?}",
            catalog_path,
            catalog.columns.len(),
            data_path
        );
        Ok(Self {
            name: table_name(catalog_path),
            catalog,
            reader,
            record: ByteRecord::new(),
            row_number: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TableSource for StagedTable {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.catalog.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let row_number = self.row_number + 1;
        let more = self.reader.read_byte_record(&mut self.record).map_err(|err| {
            if err.is_io_error() {
                ExportError::Io(err.into())
            } else {
                ExportError::source(row_number, err.to_string())
            }
        })?;
        if !more {
            return Ok(None);
        }
        self.row_number = row_number;
        let columns = &self.catalog.columns;
        if self.record.len() != columns.len() {
            return Err(ExportError::source(
                row_number,
                format!(
                    "expected {} field(s), found {}",
                    columns.len(),
                    self.record.len()
                ),
            ));
        }
        self.record
            .iter()
            .zip(columns)
            .map(|(field, column)| {
                parse_staged_value(field, column)
                    .map_err(|message| ExportError::source(row_number, message))
            })
            .collect::<Result<Row>>()
            .map(Some)
    }
}

/// Table name of a catalog file: its file name without the extension.
pub fn table_name(catalog_path: &Path) -> String {
    catalog_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn is_catalog(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| CATALOG_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}

/// Catalog files directly under `folder`, sorted by file name.
pub fn list_catalogs(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .map_err(|err| ExportError::catalog(folder, format!("Listing folder: {err}")))?;
    let mut catalogs = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|err| ExportError::catalog(folder, format!("Listing folder: {err}")))?;
        let path = entry.path();
        if is_catalog(&path) {
            catalogs.push(path);
        }
    }
    catalogs.sort();
    Ok(catalogs)
}
