//! Maps a source column onto a target SQL column type.
//!
//! Numeric columns carry their temporal meaning only in the display format, so
//! the format name is matched against three disjoint families. The families are
//! checked datetime first, then time, then date.

use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use crate::{dialect::DialectProfile, metadata::ColumnDescriptor};

/// Sub-second precision applied to datetime and time columns.
pub const FRACTIONAL_SECONDS_SUFFIX: &str = "(3)";

const DATETIME_PATTERN: &str = r"^(?:DATETIME|DATEAMPM|DTDATE|DTMONYY|DTWKDATX|DTYEAR|DTYYQC|MDYAMPM|[BE]8601(?:DT|DN|DX|DZ|LX))\d*(?:\.\d*)?$";
const TIME_PATTERN: &str =
    r"^(?:TIME|TIMEAMPM|TOD|HHMM|HOUR|MMSS|[BE]8601(?:TM|TZ|TX|LZ))\d*(?:\.\d*)?$";
const DATE_PATTERN: &str = r"^(?:YYMMDD[NBCDPS]?|MMDDYY[NBCDPS]?|DDMMYY[NBCDPS]?|DATE|DAY|DOWNAME|JULDAY|JULIAN|MMYY|MONNAME|MONTH|MONYY|QTR|WEEKDATE|WEEKDATX|WEEKDAY|WORDDATE|WORDDATX|YEAR|YYMM|YYMON|YYQ|[BE]8601DA)\d*(?:\.\d*)?$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    DateTime,
    Time,
    Date,
}

struct FamilyPatterns {
    datetime: Regex,
    time: Regex,
    date: Regex,
}

fn patterns() -> &'static FamilyPatterns {
    static PATTERNS: OnceLock<FamilyPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FamilyPatterns {
        datetime: Regex::new(DATETIME_PATTERN).expect("datetime format pattern compiles"),
        time: Regex::new(TIME_PATTERN).expect("time format pattern compiles"),
        date: Regex::new(DATE_PATTERN).expect("date format pattern compiles"),
    })
}

/// Which temporal family a display format belongs to, if any.
pub fn format_family(format: &str) -> Option<FormatFamily> {
    let format = format.trim();
    if format.is_empty() {
        return None;
    }
    let patterns = patterns();
    if patterns.datetime.is_match(format) {
        Some(FormatFamily::DateTime)
    } else if patterns.time.is_match(format) {
        Some(FormatFamily::Time)
    } else if patterns.date.is_match(format) {
        Some(FormatFamily::Date)
    } else {
        None
    }
}

/// SQL column type for `column` under `dialect`.
///
/// An unrecognised numeric display format logs a warning and falls back to
/// the dialect's numeric type with default precision.
pub fn classify(column: &ColumnDescriptor, dialect: &DialectProfile) -> String {
    if !column.is_numeric() {
        return format!("{}({})", dialect.varchar_type, column.length);
    }
    if column.length <= 2 {
        return dialect.int_type.to_string();
    }
    let format = column.format_name();
    if format.is_empty() {
        return dialect.numeric_with_precision();
    }
    match format_family(format) {
        Some(FormatFamily::DateTime) => {
            format!("{}{}", dialect.datetime_type, FRACTIONAL_SECONDS_SUFFIX)
        }
        Some(FormatFamily::Time) => format!("{}{}", dialect.time_type, FRACTIONAL_SECONDS_SUFFIX),
        Some(FormatFamily::Date) => dialect.date_type.to_string(),
        None => {
            warn!(
                "Couldn't determine column format, defaulting to numeric: {}\t{}",
                column.name, format
            );
            dialect.numeric_with_precision()
        }
    }
}
