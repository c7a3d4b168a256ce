//! Canonical text rendering of typed cell values.
//!
//! Every function here is pure and total. Quoting is the writer's concern;
//! this module only decides what the text of a cell is, or that the cell is
//! suppressed entirely.

use chrono::{DateTime, Utc};
use encoding_rs::WINDOWS_1252;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{data::CellValue, metadata::ColumnDescriptor};

/// Text forms longer than this are rounded to [`ACCURACY`] significant digits.
pub const ROUNDING_LENGTH: usize = 13;
pub const ACCURACY: i32 = 15;
/// Any rendered number containing this token is dropped from the output.
pub const INFINITY_TOKEN: &str = "Infinity";

const MAX_DECIMAL_SCALE: i32 = 28;

/// Display formats whose integer cells hold seconds from midnight.
pub const TIME_FORMATS: &[&str] = &["TIME", "HHMM"];

pub const DATETIME_KEY: &str = "DATETIME";

/// Display format key to output template.
///
/// | key                | template              |
/// |--------------------|-----------------------|
/// | YYMMDD, YYMMDDD    | `yyyy-MM-dd`          |
/// | YYMMDDN            | `yyyyMMdd`            |
/// | YYMMDDB            | `yyyy MM dd`          |
/// | YYMMDDC            | `yyyy:MM:dd`          |
/// | YYMMDDP            | `yyyy.MM.dd`          |
/// | YYMMDDS            | `yyyy/MM/dd`          |
/// | MMDDYY             | `MM/dd/yyyy`          |
/// | DDMMYY             | `dd/MM/yyyy`          |
/// | DATE               | `ddMMMyyyy`           |
/// | DATETIME           | `yyyy-MM-dd HH:mm:ss` |
pub const DATE_TEMPLATES: &[(&str, &str)] = &[
    ("YYMMDD", "%Y-%m-%d"),
    ("YYMMDDN", "%Y%m%d"),
    ("YYMMDDB", "%Y %m %d"),
    ("YYMMDDC", "%Y:%m:%d"),
    ("YYMMDDD", "%Y-%m-%d"),
    ("YYMMDDP", "%Y.%m.%d"),
    ("YYMMDDS", "%Y/%m/%d"),
    ("MMDDYY", "%m/%d/%Y"),
    ("DDMMYY", "%d/%m/%Y"),
    ("DATE", "%d%b%Y"),
    (DATETIME_KEY, "%Y-%m-%d %H:%M:%S"),
];

/// Template for a format key; keys outside the table use the datetime template.
pub fn date_template(format: &str) -> &'static str {
    DATE_TEMPLATES
        .iter()
        .find(|(key, _)| *key == format)
        .or_else(|| DATE_TEMPLATES.iter().find(|(key, _)| *key == DATETIME_KEY))
        .map(|(_, template)| *template)
        .unwrap_or("%Y-%m-%d %H:%M:%S")
}

pub fn is_time_format(format: &str) -> bool {
    TIME_FORMATS.contains(&format)
}

/// Renders a date in UTC. The epoch instant means "no date" and renders empty.
pub fn format_date(value: &DateTime<Utc>, format: &str) -> String {
    if value.timestamp_millis() == 0 {
        return String::new();
    }
    value.format(date_template(format)).to_string()
}

/// `HH:MM:SS`; hours keep counting past 23.
pub fn format_time_of_day(seconds_from_midnight: i64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds_from_midnight / 3600,
        seconds_from_midnight / 60 % 60,
        seconds_from_midnight % 60
    )
}

fn number_text(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 {
            INFINITY_TOKEN.to_string()
        } else {
            format!("-{INFINITY_TOKEN}")
        }
    } else {
        value.to_string()
    }
}

fn round_significant(value: f64) -> f64 {
    let int_digits = value.abs().log10().ceil() as i32;
    let scale = ACCURACY - int_digits;
    if (0..=MAX_DECIMAL_SCALE).contains(&scale) {
        if let Some(rounded) = Decimal::from_f64_retain(value)
            .map(|d| d.round_dp_with_strategy(scale as u32, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|d| d.to_string().parse::<f64>().ok())
        {
            return rounded;
        }
    }
    // Outside the decimal range: let the exponent formatter round the mantissa.
    format!("{:.*e}", (ACCURACY - 1) as usize, value)
        .parse()
        .unwrap_or(value)
}

fn trim_fractional_zeros(mut text: String) -> String {
    if text.contains('.') {
        let kept = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(kept);
    }
    text
}

/// Decimal text of a floating value, or `None` when it renders as infinity.
pub fn format_number(value: f64) -> Option<String> {
    let text = number_text(value);
    if text.contains(INFINITY_TOKEN) {
        return None;
    }
    let text = if text.len() > ROUNDING_LENGTH {
        number_text(round_significant(value))
    } else {
        text
    };
    Some(trim_fractional_zeros(text))
}

/// Character data is stored in the Windows-1252 code page.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Text for one non-null cell; `None` means the cell is suppressed.
pub fn format_cell(value: &CellValue, column: &ColumnDescriptor) -> Option<String> {
    let format = column.format_name();
    match value {
        CellValue::Text(bytes) => Some(decode_text(bytes)),
        CellValue::Date(date) => Some(format_date(date, format)),
        CellValue::Time(seconds) => Some(format_time_of_day(*seconds)),
        CellValue::Integer(integer) if is_time_format(format) => {
            Some(format_time_of_day(*integer))
        }
        CellValue::Integer(integer) => Some(integer.to_string()),
        CellValue::Float(float) if is_time_format(format) => {
            if float.is_infinite() {
                None
            } else {
                Some(format_time_of_day(*float as i64))
            }
        }
        CellValue::Float(float) => format_number(*float),
    }
}
