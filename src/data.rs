use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    classify::{FormatFamily, format_family},
    metadata::{ColumnDescriptor, SemanticType},
};

/// One non-null cell as yielded by a table source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Raw character data, still in the source code page.
    Text(Vec<u8>),
    Integer(i64),
    Float(f64),
    /// Date or date-time instant.
    Date(DateTime<Utc>),
    /// Seconds from midnight.
    Time(i64),
}

impl CellValue {
    pub fn text(value: &str) -> Self {
        CellValue::Text(value.as_bytes().to_vec())
    }

    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| CellValue::Date(dt.and_utc()))
    }
}

/// A row is positionally aligned with the column catalog; `None` is null.
pub type Row = Vec<Option<CellValue>>;

pub fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses `HH:MM[:SS]` or a plain number of seconds. Hours are not capped.
pub fn parse_seconds_from_midnight(value: &str) -> Option<i64> {
    if let Ok(seconds) = value.parse::<i64>() {
        return Some(seconds);
    }
    let mut parts = value.split(':');
    let hours = parts.next()?.trim().parse::<i64>().ok()?;
    let minutes = parts.next()?.trim().parse::<i64>().ok()?;
    let seconds = match parts.next() {
        Some(raw) => raw.trim().parse::<i64>().ok()?,
        None => 0,
    };
    if parts.next().is_some() || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)
}

/// Turns one staged field into a typed cell. Empty fields are null.
pub fn parse_staged_value(
    field: &[u8],
    column: &ColumnDescriptor,
) -> Result<Option<CellValue>, String> {
    if field.is_empty() {
        return Ok(None);
    }
    if column.semantic_type == SemanticType::Character {
        return Ok(Some(CellValue::Text(field.to_vec())));
    }
    let text = std::str::from_utf8(field)
        .map_err(|_| format!("Column '{}' holds non-UTF-8 numeric data", column.name))?
        .trim();
    if text.is_empty() {
        return Ok(None);
    }
    let parsed = match format_family(column.format_name()) {
        Some(FormatFamily::Date | FormatFamily::DateTime) => {
            let parsed = parse_naive_datetime(text).ok_or_else(|| {
                format!("Failed to parse '{text}' as date in column '{}'", column.name)
            })?;
            CellValue::Date(parsed.and_utc())
        }
        Some(FormatFamily::Time) => {
            let seconds = parse_seconds_from_midnight(text).ok_or_else(|| {
                format!("Failed to parse '{text}' as time in column '{}'", column.name)
            })?;
            CellValue::Time(seconds)
        }
        None => {
            if let Ok(integer) = text.parse::<i64>() {
                CellValue::Integer(integer)
            } else {
                let float = text.parse::<f64>().map_err(|_| {
                    format!("Failed to parse '{text}' as number in column '{}'", column.name)
                })?;
                CellValue::Float(float)
            }
        }
    };
    Ok(Some(parsed))
}
