//! Column catalog model and the YAML catalog file that describes a staged table.

use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use csv::QuoteStyle;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Numeric,
    Character,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Numeric => f.write_str("Numeric"),
            SemanticType::Character => f.write_str("Character"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ColumnDescriptor {
    pub fn numeric(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            semantic_type: SemanticType::Numeric,
            length,
            format: None,
            label: None,
        }
    }

    pub fn character(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            semantic_type: SemanticType::Character,
            length,
            format: None,
            label: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Display format, or the empty string when the column has none.
    pub fn format_name(&self) -> &str {
        self.format.as_deref().map(str::trim).unwrap_or("")
    }

    /// Label when present and not blank.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.trim().is_empty())
    }

    pub fn is_numeric(&self) -> bool {
        self.semantic_type == SemanticType::Numeric
    }
}

fn default_has_headers() -> bool {
    true
}

/// Column catalog of one staged table plus the location of its data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableCatalog {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            data: None,
            has_headers: true,
            columns,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|err| ExportError::catalog(path, format!("Opening catalog: {err}")))?;
        let catalog: TableCatalog = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| ExportError::catalog(path, format!("Parsing catalog YAML: {err}")))?;
        catalog.validate().map_err(|message| ExportError::catalog(path, message))?;
        Ok(catalog)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err("Column name cannot be empty".to_string());
            }
            if column.length == 0 {
                return Err(format!("Column '{}' must have a positive length", column.name));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(format!("Duplicate column name '{}'", column.name));
            }
        }
        Ok(())
    }

    /// Data file location: the explicit `data` entry resolved against the
    /// catalog's directory, or the sibling `<stem>.csv`.
    pub fn data_path(&self, catalog_path: &Path) -> PathBuf {
        let base = catalog_path.parent().unwrap_or_else(|| Path::new(""));
        match &self.data {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => catalog_path.with_extension("csv"),
        }
    }
}

/// Writes the column catalog as a CSV summary table.
pub fn write_metadata<W: Write>(writer: W, columns: &[ColumnDescriptor]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(writer);
    csv_writer
        .write_record(["Number", "Name", "Type", "Length", "Format", "Label"])
        .map_err(std::io::Error::from)?;
    for (idx, column) in columns.iter().enumerate() {
        let number = (idx + 1).to_string();
        let semantic_type = column.semantic_type.to_string();
        let length = column.length.to_string();
        csv_writer
            .write_record([
                number.as_str(),
                column.name.as_str(),
                semantic_type.as_str(),
                length.as_str(),
                column.format_name(),
                column.label_text().unwrap_or(""),
            ])
            .map_err(std::io::Error::from)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_yaml_parses_types_formats_and_labels() {
        let yaml = "columns:\n  - name: ID\n    type: numeric\n    length: 2\n  - name: VISIT\n    type: numeric\n    length: 8\n    format: YYMMDD\n    label: Visit date\n";
        let catalog: TableCatalog = serde_yaml::from_str(yaml).unwrap();
        assert!(catalog.has_headers);
        assert_eq!(catalog.columns.len(), 2);
        assert_eq!(catalog.columns[0].semantic_type, SemanticType::Numeric);
        assert_eq!(catalog.columns[1].format_name(), "YYMMDD");
        assert_eq!(catalog.columns[1].label_text(), Some("Visit date"));
    }

    #[test]
    fn validate_rejects_zero_length_and_duplicates() {
        let zero = TableCatalog::new(vec![ColumnDescriptor::numeric("A", 0)]);
        assert!(zero.validate().unwrap_err().contains("positive length"));

        let dup = TableCatalog::new(vec![
            ColumnDescriptor::numeric("A", 8),
            ColumnDescriptor::character("A", 4),
        ]);
        assert!(dup.validate().unwrap_err().contains("Duplicate"));
    }

    #[test]
    fn blank_labels_are_ignored() {
        let column = ColumnDescriptor::character("NAME", 20).with_label("  ");
        assert_eq!(column.label_text(), None);
    }

    #[test]
    fn data_path_defaults_to_sibling_csv() {
        let catalog = TableCatalog::new(Vec::new());
        assert_eq!(
            catalog.data_path(Path::new("dir/PATIENTS.yaml")),
            PathBuf::from("dir/PATIENTS.csv")
        );
        let explicit = TableCatalog {
            data: Some(PathBuf::from("raw/p.csv")),
            ..TableCatalog::new(Vec::new())
        };
        assert_eq!(
            explicit.data_path(Path::new("dir/PATIENTS.yaml")),
            PathBuf::from("dir/raw/p.csv")
        );
    }

    #[test]
    fn load_rejects_invalid_catalog_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VISITS.yaml");
        std::fs::write(&path, "columns:\n  - name: ID\n    type: numeric\n    length: 0\n").unwrap();

        match TableCatalog::load(&path) {
            Err(ExportError::CatalogIo { path: reported, message }) => {
                assert_eq!(reported, path);
                assert!(message.contains("positive length"));
            }
            other => panic!("expected catalog failure, got {other:?}"),
        }
    }

    #[test]
    fn metadata_table_lists_every_column() {
        let columns = vec![
            ColumnDescriptor::numeric("ID", 2),
            ColumnDescriptor::character("NAME", 20).with_label("Full, name"),
        ];
        let mut out = Vec::new();
        write_metadata(&mut out, &columns).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Number,Name,Type,Length,Format,Label\n1,ID,Numeric,2,,\n2,NAME,Character,20,,\"Full, name\"\n"
        );
    }
}
