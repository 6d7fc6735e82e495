//! Field normalization: raw rows to typed [`BookingRecord`]s.
//!
//! - missing `children` becomes `0` (the one documented fill)
//! - `arrival_date_month` names become [`Month`]
//! - integer columns are parsed; pandas-style `2.0` spellings are accepted

use tracing::{debug, trace};

use crate::error::{NormalizeError, NormalizeResult};
use crate::models::{BookingRecord, Month};
use crate::parser::{RawRow, RawTable};

/// Tokens treated as a missing value, matching the common pandas NA spellings.
const MISSING_TOKENS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "NULL", "null"];

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<BookingRecord>,
    /// Rows whose missing `children` value was set to 0.
    pub children_filled: usize,
}

/// Returns true if a raw value counts as missing.
pub fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || MISSING_TOKENS.contains(&raw)
}

/// Normalize every row of `table`, in order.
pub fn normalize(table: &RawTable) -> NormalizeResult<Normalized> {
    let mut records = Vec::with_capacity(table.len());
    let mut children_filled = 0;

    for row in table.rows() {
        let (record, filled) = normalize_row(row)?;
        if filled {
            trace!(ordinal = record.ordinal, "children missing, set to 0");
            children_filled += 1;
        }
        records.push(record);
    }

    debug!(rows = records.len(), children_filled, "normalized rows");
    Ok(Normalized {
        records,
        children_filled,
    })
}

/// Normalize one row. The flag reports whether `children` was filled.
pub fn normalize_row(row: RawRow<'_>) -> NormalizeResult<(BookingRecord, bool)> {
    let ordinal = row.ordinal();

    let (children, filled) = match row.get("children") {
        Some(raw) if !is_missing(raw) => (parse_int(ordinal, "children", raw)?, false),
        _ => (0, true),
    };

    let month_name = required(row, "arrival_date_month")?;
    let arrival_date_month =
        Month::from_name(month_name).ok_or_else(|| NormalizeError::InvalidMonth {
            ordinal,
            value: month_name.to_string(),
        })?;

    let record = BookingRecord {
        ordinal,
        hotel: required(row, "hotel")?.to_string(),
        is_canceled: parse_flag(ordinal, "is_canceled", required(row, "is_canceled")?)?,
        lead_time: int_field(row, "lead_time")?,
        adults: int_field(row, "adults")?,
        children,
        babies: int_field(row, "babies")?,
        stays_in_weekend_nights: int_field(row, "stays_in_weekend_nights")?,
        stays_in_week_nights: int_field(row, "stays_in_week_nights")?,
        arrival_date_year: int_field(row, "arrival_date_year")?,
        arrival_date_month,
        arrival_date_day_of_month: day_field(row)?,
    };

    Ok((record, filled))
}

fn required<'a>(row: RawRow<'a>, column: &str) -> NormalizeResult<&'a str> {
    match row.get(column) {
        Some(raw) if !is_missing(raw) => Ok(raw),
        _ => Err(NormalizeError::MissingValue {
            ordinal: row.ordinal(),
            column: column.to_string(),
        }),
    }
}

fn int_field<T: TryFrom<i64>>(row: RawRow<'_>, column: &str) -> NormalizeResult<T> {
    let raw = required(row, column)?;
    parse_int(row.ordinal(), column, raw)
}

fn day_field(row: RawRow<'_>) -> NormalizeResult<u8> {
    let column = "arrival_date_day_of_month";
    let raw = required(row, column)?;
    let day: u8 = parse_int(row.ordinal(), column, raw)?;
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(invalid(row.ordinal(), column, raw))
    }
}

/// Parse an integer into `T`, accepting integral float spellings like `2.0`.
fn parse_int<T: TryFrom<i64>>(ordinal: usize, column: &str, raw: &str) -> NormalizeResult<T> {
    let value = match raw.parse::<i64>() {
        Ok(v) => v,
        Err(_) => match raw.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => return Err(invalid(ordinal, column, raw)),
        },
    };
    T::try_from(value).map_err(|_| invalid(ordinal, column, raw))
}

fn parse_flag(ordinal: usize, column: &str, raw: &str) -> NormalizeResult<bool> {
    match parse_int::<u8>(ordinal, column, raw)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(invalid(ordinal, column, raw)),
    }
}

fn invalid(ordinal: usize, column: &str, raw: &str) -> NormalizeError {
    NormalizeError::InvalidInteger {
        ordinal,
        column: column.to_string(),
        value: raw.to_string(),
    }
}
