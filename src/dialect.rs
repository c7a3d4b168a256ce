//! Per-database parameter bundles.
//!
//! A dialect is pure data: the identifier quote, the NULL token written into
//! CSV files, and the type names used when generating DDL. Adding a third
//! dialect means adding one more constant to [`DIALECTS`].

use std::{fmt, str::FromStr};

use crate::error::{ExportError, Result};

pub const DIALECT_MYSQL: &str = "MySQL";
pub const DIALECT_POSTGRESQL: &str = "PostgreSQL";

/// Statement shape used by the schema generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    MySql,
    PostgreSql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    pub kind: DialectKind,
    pub name: &'static str,
    pub quote: &'static str,
    pub null_token: &'static str,
    pub int_type: &'static str,
    pub numeric_type: &'static str,
    pub default_precision: &'static str,
    pub varchar_type: &'static str,
    pub date_type: &'static str,
    pub time_type: &'static str,
    pub datetime_type: &'static str,
}

pub const MYSQL: DialectProfile = DialectProfile {
    kind: DialectKind::MySql,
    name: DIALECT_MYSQL,
    quote: "`",
    null_token: "\\N",
    int_type: "int",
    numeric_type: "decimal",
    default_precision: "(38,15)",
    varchar_type: "varchar",
    date_type: "date",
    time_type: "time",
    datetime_type: "datetime",
};

pub const POSTGRESQL: DialectProfile = DialectProfile {
    kind: DialectKind::PostgreSql,
    name: DIALECT_POSTGRESQL,
    quote: "\"",
    null_token: "\\N",
    int_type: "integer",
    numeric_type: "numeric",
    default_precision: "(38,15)",
    varchar_type: "varchar",
    date_type: "date",
    time_type: "time",
    datetime_type: "timestamp",
};

pub const DIALECTS: &[DialectProfile] = &[MYSQL, POSTGRESQL];

impl DialectProfile {
    /// Looks up a built-in profile. Names are matched exactly.
    pub fn by_name(name: Option<&str>) -> Result<&'static DialectProfile> {
        let name = match name.map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(ExportError::MissingDialect),
        };
        DIALECTS
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| ExportError::UnsupportedDialect(name.to_string()))
    }

    /// Wraps an identifier in the dialect's quote character.
    ///
    /// Embedded quote characters are not escaped.
    pub fn quote_identifier(&self, identifier: &str) -> String {
        format!("{q}{identifier}{q}", q = self.quote)
    }

    pub fn numeric_with_precision(&self) -> String {
        format!("{}{}", self.numeric_type, self.default_precision)
    }
}

impl FromStr for DialectProfile {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        DialectProfile::by_name(Some(s)).copied()
    }
}

impl fmt::Display for DialectProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
