mod common;

use std::fs;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::str::contains;

fn binary() -> Command {
    Command::cargo_bin("sas-export").expect("binary exists")
}

#[test]
fn csv_command_writes_postgres_ready_file() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();
    let output = workspace.path().join("patients.csv");

    binary()
        .args([
            "csv",
            "-i",
            catalog.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--dialect",
            "PostgreSQL",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read csv output");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "\"ID\",\"NAME\",\"VISIT\"");
    assert_eq!(lines[1], "\"1\",\"Ana\",\"2024-01-15\"");
    assert_eq!(lines[2], "\"2\",\"José, Jr.\",\\N");
}

#[test]
fn csv_command_plain_mode_to_stdout_with_custom_delimiter() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();

    binary()
        .args([
            "csv",
            "-i",
            catalog.to_str().unwrap(),
            "--delimiter",
            "pipe",
            "--no-header",
        ])
        .assert()
        .success()
        .stdout("1|Ana|2024-01-15\n2|José, Jr.|\n3||\n");
}

#[test]
fn csv_command_prints_metadata_when_requested() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();
    let output = workspace.path().join("out.csv");

    binary()
        .args([
            "csv",
            "-i",
            catalog.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--metadata",
        ])
        .assert()
        .success()
        .stdout(contains("Metadata for"))
        .stdout(contains("3,VISIT,Numeric,8,YYMMDD,"))
        .stdout(contains("-----------------"));
}

#[test]
fn csv_command_rejects_unknown_dialect_before_writing() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();
    let output = workspace.path().join("never.csv");

    binary()
        .args([
            "csv",
            "-i",
            catalog.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--dialect",
            "Oracle",
        ])
        .assert()
        .failure()
        .stderr(contains("Unsupported dialect: Oracle"));
    assert!(!output.exists());
}

#[test]
fn schema_command_writes_mysql_script() {
    let workspace = TestWorkspace::new();
    workspace.stage_patients();
    let script_path = workspace.path().join("schema.sql");

    binary()
        .args([
            "schema",
            "-f",
            workspace.path().to_str().unwrap(),
            "-q",
            script_path.to_str().unwrap(),
            "-s",
            "clinic",
        ])
        .assert()
        .success();

    let script = fs::read_to_string(&script_path).expect("read script");
    assert!(script.starts_with("CREATE DATABASE `clinic`;\n\nUSE `clinic`;\n\n"));
    assert!(script.contains("CREATE TABLE IF NOT EXISTS `PATIENTS` (\n"));
    assert!(script.contains(" `NAME` varchar(20) NULL DEFAULT NULL COMMENT 'Patient name',\n"));
    assert!(script.ends_with(") ENGINE='InnoDB' CHARACTER SET latin1 COLLATE latin1_bin;\n\n"));
}

#[test]
fn schema_command_requires_non_blank_schema() {
    let workspace = TestWorkspace::new();
    let script_path = workspace.path().join("schema.sql");

    binary()
        .args([
            "schema",
            "-f",
            workspace.path().to_str().unwrap(),
            "-q",
            script_path.to_str().unwrap(),
            "-s",
            " ",
        ])
        .assert()
        .failure()
        .stderr(contains("Schema name must not be blank"));
    assert!(!script_path.exists());
}

#[test]
fn metadata_command_lists_columns() {
    let workspace = TestWorkspace::new();
    let catalog = workspace.stage_patients();

    binary()
        .args(["metadata", "-i", catalog.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            "Number,Name,Type,Length,Format,Label\n\
             1,ID,Numeric,2,,\n\
             2,NAME,Character,20,,Patient name\n\
             3,VISIT,Numeric,8,YYMMDD,\n",
        );
}
