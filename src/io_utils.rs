//! Reader and writer construction shared by the export commands.
//!
//! - **Sinks**: `open_output` returns a buffered file writer, or stdout for
//!   `-` and absent paths. Output is always UTF-8.
//! - **Staged data**: `open_csv_reader` configures the `csv` reader used for
//!   staged table data. Fields stay raw bytes; decoding happens per column.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(BufWriter::new(std::io::stdout())),
    };
    Ok(writer)
}

pub fn describe_output(path: Option<&Path>) -> String {
    match path {
        Some(p) if !is_dash(p) => p.display().to_string(),
        _ => "stdout".to_string(),
    }
}

pub fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_and_missing_paths_go_to_stdout() {
        assert!(is_dash(Path::new("-")));
        assert!(!is_dash(Path::new("out.csv")));
        assert_eq!(describe_output(None), "stdout");
        assert_eq!(describe_output(Some(Path::new("-"))), "stdout");
        assert_eq!(describe_output(Some(Path::new("out.csv"))), "out.csv");
    }

    #[test]
    fn printable_delimiter_escapes_whitespace() {
        assert_eq!(printable_delimiter(b'\t'), "\\t");
        assert_eq!(printable_delimiter(b'|'), "|");
    }

    #[test]
    fn staged_reader_keeps_raw_bytes() {
        let data: &[u8] = b"NAME\nCaf\xe9\n";
        let mut reader = open_csv_reader(data, b',', true);
        let mut record = csv::ByteRecord::new();
        assert!(reader.read_byte_record(&mut record).unwrap());
        assert_eq!(&record[0], b"Caf\xe9");
    }
}
