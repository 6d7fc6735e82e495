//! Source table loader.
//!
//! Reads the raw bookings CSV into an ordered, in-memory [`RawTable`].
//! Only structure is checked here (header present, consistent field
//! counts, valid UTF-8); typing and value checks happen in
//! [`crate::transform::normalize`].

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{LoadError, LoadResult};

/// The 32 columns of the reference hotel bookings dataset, in file order.
pub const SOURCE_COLUMNS: [&str; 32] = [
    "hotel",
    "is_canceled",
    "lead_time",
    "arrival_date_year",
    "arrival_date_month",
    "arrival_date_week_number",
    "arrival_date_day_of_month",
    "stays_in_weekend_nights",
    "stays_in_week_nights",
    "adults",
    "children",
    "babies",
    "meal",
    "country",
    "market_segment",
    "distribution_channel",
    "is_repeated_guest",
    "previous_cancellations",
    "previous_bookings_not_canceled",
    "reserved_room_type",
    "assigned_room_type",
    "booking_changes",
    "deposit_type",
    "agent",
    "company",
    "days_in_waiting_list",
    "customer_type",
    "adr",
    "required_car_parking_spaces",
    "total_of_special_requests",
    "reservation_status",
    "reservation_status_date",
];

/// Columns the pipeline actually reads.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "hotel",
    "is_canceled",
    "lead_time",
    "adults",
    "children",
    "babies",
    "stays_in_weekend_nights",
    "stays_in_week_nights",
    "arrival_date_year",
    "arrival_date_month",
    "arrival_date_day_of_month",
];

/// Raw source rows with header lookup. Row order is source order.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

/// Borrowed view of one source row.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    table: &'a RawTable,
    ordinal: usize,
}

impl RawTable {
    fn new(headers: Vec<String>, rows: Vec<StringRecord>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Columns from `required` that the header lacks, in the given order.
    pub fn missing_columns<'c>(&self, required: &[&'c str]) -> Vec<&'c str> {
        required
            .iter()
            .copied()
            .filter(|c| !self.has_column(c))
            .collect()
    }

    /// Fail with [`LoadError::MissingColumn`] on the first absent column.
    pub fn require_columns(&self, required: &[&str]) -> LoadResult<()> {
        match self.missing_columns(required).first() {
            Some(missing) => Err(LoadError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Row at `ordinal`, if in range.
    pub fn row(&self, ordinal: usize) -> Option<RawRow<'_>> {
        (ordinal < self.rows.len()).then_some(RawRow {
            table: self,
            ordinal,
        })
    }

    /// Rows in source order.
    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> + '_ {
        (0..self.rows.len()).map(move |ordinal| RawRow {
            table: self,
            ordinal,
        })
    }
}

impl<'a> RawRow<'a> {
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Raw (trimmed) value of `column`, or `None` if the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = *self.table.index.get(column)?;
        self.table.rows[self.ordinal].get(idx)
    }
}

/// Load the source table from a file.
pub fn load_table<P: AsRef<Path>>(path: P, delimiter: u8) -> LoadResult<RawTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening source table");
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, delimiter)
}

/// Parse a CSV string. Convenience wrapper over [`read_table`].
pub fn parse_table(content: &str, delimiter: u8) -> LoadResult<RawTable> {
    read_table(content.as_bytes(), delimiter)
}

/// Read the source table from any reader.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> LoadResult<RawTable> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(map_csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(LoadError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        rows.push(record.map_err(map_csv_error)?);
    }

    debug!(rows = rows.len(), columns = headers.len(), "parsed source table");
    Ok(RawTable::new(headers, rows))
}

fn map_csv_error(err: csv::Error) -> LoadError {
    match err.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => LoadError::ColumnCountMismatch {
            line: pos.as_ref().map_or(0, |p| p.line()),
            expected: *expected_len,
            found: *len,
        },
        _ => LoadError::Csv(err),
    }
}
