//! Output projections.
//!
//! Each view is a fixed column set over the enriched records, keyed by
//! `booking_id`:
//!
//! | View | Columns |
//! |---|---|
//! | `bookings_core` | booking_id, hotel, is_canceled, lead_time, total_guests, stay_duration |
//! | `arrival_metadata` | booking_id, arrival_date_year, arrival_date_month, arrival_date_day_of_month, stays_in_weekend_nights |
//! | `booking_financials` | booking_id, hotel, is_canceled, stay_duration, total_cost |

use crate::models::EnrichedRecord;

pub const BOOKINGS_CORE: &str = "bookings_core";
pub const ARRIVAL_METADATA: &str = "arrival_metadata";
pub const BOOKING_FINANCIALS: &str = "booking_financials";

pub const BOOKINGS_CORE_COLUMNS: &[&str] = &[
    "booking_id",
    "hotel",
    "is_canceled",
    "lead_time",
    "total_guests",
    "stay_duration",
];

pub const ARRIVAL_METADATA_COLUMNS: &[&str] = &[
    "booking_id",
    "arrival_date_year",
    "arrival_date_month",
    "arrival_date_day_of_month",
    "stays_in_weekend_nights",
];

pub const BOOKING_FINANCIALS_COLUMNS: &[&str] = &[
    "booking_id",
    "hotel",
    "is_canceled",
    "stay_duration",
    "total_cost",
];

/// One projected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    /// USD amount, written with two decimals.
    Money(f64),
}

impl Cell {
    /// Empty text and non-finite amounts count as null.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Integer(_) => false,
            Cell::Money(v) => !v.is_finite(),
        }
    }

    /// CSV rendering.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(i) => i.to_string(),
            Cell::Money(v) => format!("{v:.2}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Integer(i64::from(b))
    }
}

impl From<u32> for Cell {
    fn from(v: u32) -> Self {
        Cell::Integer(i64::from(v))
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Cell::Integer(i64::from(v))
    }
}

impl From<u8> for Cell {
    fn from(v: u8) -> Self {
        Cell::Integer(i64::from(v))
    }
}

/// A projected row, tagged with its source ordinal for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub ordinal: usize,
    pub cells: Vec<Cell>,
}

/// A named projection ready for audit and export.
#[derive(Debug, Clone)]
pub struct View {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<ViewRow>,
}

impl View {
    fn project<F>(
        name: &'static str,
        columns: &'static [&'static str],
        records: &[EnrichedRecord],
        row: F,
    ) -> Self
    where
        F: Fn(&EnrichedRecord) -> Vec<Cell>,
    {
        let rows = records
            .iter()
            .map(|r| ViewRow {
                ordinal: r.ordinal(),
                cells: row(r),
            })
            .collect();
        Self {
            name,
            columns,
            rows,
        }
    }

    /// `<name>.csv`
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}

pub fn bookings_core(records: &[EnrichedRecord]) -> View {
    View::project(BOOKINGS_CORE, BOOKINGS_CORE_COLUMNS, records, |r| {
        vec![
            Cell::from(r.booking_id.as_str()),
            Cell::from(r.booking.hotel.as_str()),
            Cell::from(r.booking.is_canceled),
            Cell::from(r.booking.lead_time),
            Cell::from(r.total_guests),
            Cell::from(r.stay_duration),
        ]
    })
}

pub fn arrival_metadata(records: &[EnrichedRecord]) -> View {
    View::project(ARRIVAL_METADATA, ARRIVAL_METADATA_COLUMNS, records, |r| {
        vec![
            Cell::from(r.booking_id.as_str()),
            Cell::from(r.booking.arrival_date_year),
            Cell::from(r.booking.arrival_date_month.number()),
            Cell::from(r.booking.arrival_date_day_of_month),
            Cell::from(r.booking.stays_in_weekend_nights),
        ]
    })
}

pub fn booking_financials(records: &[EnrichedRecord]) -> View {
    View::project(BOOKING_FINANCIALS, BOOKING_FINANCIALS_COLUMNS, records, |r| {
        vec![
            Cell::from(r.booking_id.as_str()),
            Cell::from(r.booking.hotel.as_str()),
            Cell::from(r.booking.is_canceled),
            Cell::from(r.stay_duration),
            Cell::Money(r.total_cost),
        ]
    })
}

/// All three views, in export order.
pub fn project_all(records: &[EnrichedRecord]) -> Vec<View> {
    vec![
        bookings_core(records),
        arrival_metadata(records),
        booking_financials(records),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingRecord, Month};

    fn record(ordinal: usize) -> EnrichedRecord {
        EnrichedRecord {
            booking: BookingRecord {
                ordinal,
                hotel: "City Hotel".into(),
                is_canceled: true,
                lead_time: 9,
                adults: 2,
                children: 1,
                babies: 0,
                stays_in_weekend_nights: 1,
                stays_in_week_nights: 1,
                arrival_date_year: 2017,
                arrival_date_month: Month::July,
                arrival_date_day_of_month: 14,
            },
            total_guests: 3,
            stay_duration: 2,
            booking_id: format!("{ordinal:064x}"),
            total_cost: 70.2,
        }
    }

    #[test]
    fn test_views_have_fixed_columns_and_order() {
        let records = vec![record(0), record(1)];
        let views = project_all(&records);

        let names: Vec<_> = views.iter().map(|v| v.name).collect();
        assert_eq!(names, [BOOKINGS_CORE, ARRIVAL_METADATA, BOOKING_FINANCIALS]);
        for view in &views {
            assert_eq!(view.rows.len(), 2);
            assert_eq!(view.columns[0], "booking_id");
            assert_eq!(view.rows[1].ordinal, 1);
            for row in &view.rows {
                assert_eq!(row.cells.len(), view.columns.len());
            }
        }
    }

    #[test]
    fn test_rendered_values() {
        let records = vec![record(0)];
        let core = bookings_core(&records);
        let rendered: Vec<String> = core.rows[0].cells.iter().map(Cell::render).collect();
        assert_eq!(rendered[1..], ["City Hotel", "1", "9", "3", "2"]);

        let arrival = arrival_metadata(&records);
        let rendered: Vec<String> = arrival.rows[0].cells.iter().map(Cell::render).collect();
        assert_eq!(rendered[1..], ["2017", "7", "14", "1"]);

        let fin = booking_financials(&records);
        assert_eq!(fin.rows[0].cells[4].render(), "70.20");
        assert_eq!(fin.file_name(), "booking_financials.csv");
    }

    #[test]
    fn test_cell_nulls() {
        assert!(Cell::Text(String::new()).is_null());
        assert!(Cell::Text("  ".into()).is_null());
        assert!(Cell::Money(f64::NAN).is_null());
        assert!(Cell::Money(f64::INFINITY).is_null());
        assert!(!Cell::Money(0.0).is_null());
        assert!(!Cell::Integer(0).is_null());
        assert!(!Cell::from("x").is_null());
    }

    #[test]
    fn test_money_always_two_decimals() {
        assert_eq!(Cell::Money(351.0).render(), "351.00");
        assert_eq!(Cell::Money(0.0).render(), "0.00");
        assert_eq!(Cell::Money(12.5).render(), "12.50");
    }
}
