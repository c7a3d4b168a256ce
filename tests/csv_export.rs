mod common;

use chrono::{TimeZone, Utc};
use common::TestWorkspace;
use sas_export::{
    CellValue, ColumnDescriptor, CsvRowWriter, ExportError, MYSQL, MemoryTable, POSTGRESQL,
    StagedTable, TableSource,
};

fn export_to_string(
    source: &mut dyn TableSource,
    dialect: Option<sas_export::DialectProfile>,
) -> String {
    let mut writer = CsvRowWriter::new(Vec::new()).with_dialect(dialect);
    writer.export(source, true).expect("export rows");
    String::from_utf8(writer.finish().expect("finish")).expect("utf-8 output")
}

#[test]
fn staged_table_exports_plain_csv() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();
    let mut table = StagedTable::open(&catalog).expect("open staged table");
    assert_eq!(table.name(), "PATIENTS");

    let output = export_to_string(&mut table, None);
    assert_eq!(
        output,
        "ID,NAME,VISIT\n1,Ana,2024-01-15\n2,\"José, Jr.\",\n3,,\n"
    );
}

#[test]
fn staged_table_exports_mysql_csv() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();
    let mut table = StagedTable::open(&catalog).expect("open staged table");

    let output = export_to_string(&mut table, Some(MYSQL));
    assert_eq!(
        output,
        "\"ID\",\"NAME\",\"VISIT\"\n\
         \"1\",\"Ana\",\"2024-01-15\"\n\
         \"2\",\"José, Jr.\",\\N\n\
         \"3\",\\N,\"\"\n"
    );
}

#[test]
fn infinity_and_time_cells_follow_formatting_rules() {
    let columns = vec![
        ColumnDescriptor::numeric("SCORE", 8),
        ColumnDescriptor::numeric("CLOCK", 8).with_format("HHMM"),
        ColumnDescriptor::numeric("STAMP", 8).with_format("DATETIME"),
    ];
    let stamp = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
    let mut table = MemoryTable::new(
        columns,
        vec![vec![
            Some(CellValue::Float(f64::INFINITY)),
            Some(CellValue::Integer(3661)),
            Some(CellValue::Date(stamp)),
        ]],
    );
    let output = export_to_string(&mut table, Some(POSTGRESQL));
    assert_eq!(
        output,
        "\"SCORE\",\"CLOCK\",\"STAMP\"\n,\"01:01:01\",\"2023-12-31 23:59:58\"\n"
    );
}

#[test]
fn row_with_wrong_field_count_aborts_export() {
    let workspace = TestWorkspace::new();
    workspace.write("T.csv", "A,B\n1,2\n3\n");
    let catalog = workspace.write(
        "T.yaml",
        "columns:\n  - {name: A, type: numeric, length: 8}\n  - {name: B, type: numeric, length: 8}\n",
    );
    let mut table = StagedTable::open(&catalog).expect("open staged table");
    let mut writer = CsvRowWriter::new(Vec::new());
    let err = writer.export(&mut table, true).unwrap_err();
    assert!(matches!(err, ExportError::Source { row: 2, .. }), "{err:?}");
    assert_eq!(writer.rows_written(), 1);
    assert_eq!(writer.finish().unwrap(), b"A,B\n1,2\n");
}

#[test]
fn missing_data_file_is_a_catalog_failure() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.write("GONE.yaml", common::PATIENTS_CATALOG);
    match StagedTable::open(&catalog) {
        Err(ExportError::CatalogIo { path, .. }) => assert!(path.ends_with("GONE.csv")),
        Err(other) => panic!("expected catalog failure, got {other:?}"),
        Ok(_) => panic!("expected catalog failure"),
    }
}

#[test]
fn headerless_data_uses_explicit_data_path() {
    let workspace = TestWorkspace::new();
    std::fs::create_dir(workspace.path().join("raw")).expect("create raw dir");
    workspace.write("raw/values.txt", "10\n20.25\n");
    let catalog = workspace.write(
        "AMOUNTS.yaml",
        "data: raw/values.txt\nhas_headers: false\ncolumns:\n  - {name: AMOUNT, type: numeric, length: 8}\n",
    );
    let mut table = StagedTable::open(&catalog).expect("open staged table");
    let output = export_to_string(&mut table, None);
    assert_eq!(output, "AMOUNT\n10\n20.25\n");
}
