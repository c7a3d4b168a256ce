//! Streaming CSV writer with dialect-aware quoting and NULL encoding.
//!
//! With a dialect configured every non-null field is quoted and nulls are
//! written as the dialect's NULL token, so bulk loaders can tell the two
//! apart. Without a dialect ("plain" mode) fields are quoted only when they
//! have to be and nulls become empty fields.

use std::{borrow::Cow, io::Write};

use log::debug;

use crate::{
    data::{CellValue, Row},
    dialect::DialectProfile,
    error::Result,
    format::format_cell,
    io_utils::DEFAULT_CSV_DELIMITER,
    metadata::ColumnDescriptor,
    source::TableSource,
};

pub const DEFAULT_TERMINATOR: &str = "\n";
pub const QUOTE: char = '"';

const SPECIAL_CHARACTERS: &[char] = &['\n', '\t', '\r', QUOTE];

/// True when `text` has to be quoted under minimal quoting.
pub fn needs_quotes(text: &str, delimiter: char) -> bool {
    text.contains(delimiter) || text.contains(SPECIAL_CHARACTERS)
}

fn double_quotes(text: &str) -> Cow<'_, str> {
    if text.contains(QUOTE) {
        Cow::Owned(text.replace('"', "\"\""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Quote policy for dialect output: always wrap.
pub fn quote_always(text: &str) -> Cow<'_, str> {
    Cow::Owned(format!("{QUOTE}{}{QUOTE}", double_quotes(text)))
}

/// Quote policy for plain output: wrap only when required, never wrap empty text.
pub fn quote_minimal(text: &str, delimiter: char) -> Cow<'_, str> {
    if !text.is_empty() && needs_quotes(text, delimiter) {
        Cow::Owned(format!("{QUOTE}{}{QUOTE}", double_quotes(text)))
    } else {
        Cow::Borrowed(text)
    }
}

pub struct CsvRowWriter<W: Write> {
    sink: W,
    delimiter: char,
    terminator: String,
    dialect: Option<DialectProfile>,
    rows_written: usize,
}

impl<W: Write> CsvRowWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            delimiter: DEFAULT_CSV_DELIMITER as char,
            terminator: DEFAULT_TERMINATOR.to_string(),
            dialect: None,
            rows_written: 0,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter as char;
        self
    }

    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    pub fn with_dialect(mut self, dialect: Option<DialectProfile>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn quote<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.dialect {
            Some(_) => quote_always(text),
            None => quote_minimal(text, self.delimiter),
        }
    }

    fn null_field(&self) -> &'static str {
        self.dialect.map(|d| d.null_token).unwrap_or("")
    }

    fn render_cell(&self, value: Option<&CellValue>, column: &ColumnDescriptor) -> String {
        match value {
            None => self.null_field().to_string(),
            Some(value) => match format_cell(value, column) {
                Some(text) => self.quote(&text).into_owned(),
                None => String::new(),
            },
        }
    }

    fn write_line(&mut self, fields: &[String]) -> Result<()> {
        let mut line = String::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
        for (idx, field) in fields.iter().enumerate() {
            if idx > 0 {
                line.push(self.delimiter);
            }
            line.push_str(field);
        }
        line.push_str(&self.terminator);
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Writes the column names, quoted like data values.
    pub fn write_header(&mut self, columns: &[ColumnDescriptor]) -> Result<()> {
        let fields = columns
            .iter()
            .map(|column| self.quote(&column.name).into_owned())
            .collect::<Vec<_>>();
        self.write_line(&fields)
    }

    /// Writes one row and flushes the sink. Missing trailing values are null.
    pub fn write_row(&mut self, columns: &[ColumnDescriptor], row: &[Option<CellValue>]) -> Result<()> {
        let fields = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| self.render_cell(row.get(idx).and_then(Option::as_ref), column))
            .collect::<Vec<_>>();
        self.write_line(&fields)?;
        self.sink.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    /// Writes rows in order, stopping at the first absent row.
    pub fn write_rows(&mut self, columns: &[ColumnDescriptor], rows: &[Option<Row>]) -> Result<usize> {
        let mut written = 0usize;
        for row in rows {
            let Some(row) = row else { break };
            self.write_row(columns, row)?;
            written += 1;
        }
        Ok(written)
    }

    /// Streams every row of `source`, optionally preceded by a header.
    ///
    /// Stops at the first source or sink error; rows already written stay.
    pub fn export<S: TableSource + ?Sized>(&mut self, source: &mut S, include_header: bool) -> Result<usize> {
        let columns = source.columns().to_vec();
        if include_header {
            self.write_header(&columns)?;
        }
        let mut written = 0usize;
        while let Some(row) = source.next_row()? {
            self.write_row(&columns, &row)?;
            written += 1;
        }
        debug!("Exported {written} row(s) across {} column(s)", columns.len());
        Ok(written)
    }

    /// Flushes and hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
