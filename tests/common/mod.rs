#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const PATIENTS_CATALOG: &str = "\
columns:
  - name: ID
    type: numeric
    length: 2
  - name: NAME
    type: character
    length: 20
    label: Patient name
  - name: VISIT
    type: numeric
    length: 8
    format: YYMMDD
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Writes raw bytes, for data files in a legacy code page.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Stages the PATIENTS table and returns the catalog path.
    pub fn stage_patients(&self) -> PathBuf {
        self.write_bytes(
            "PATIENTS.csv",
            b"ID,NAME,VISIT\n1,Ana,2024-01-15\n2,\"Jos\xe9, Jr.\",\n3,,1970-01-01\n",
        );
        self.write("PATIENTS.yaml", PATIENTS_CATALOG)
    }
}
