//! Domain models for the booking pipeline.
//!
//! Each stage consumes one record type and produces the next:
//!
//! - [`BookingRecord`] - typed, normalized source row
//! - [`DerivedRecord`] - plus `total_guests` and `stay_duration`
//! - [`KeyedRecord`] - plus the `booking_id` join key
//! - [`EnrichedRecord`] - plus the simulated `total_cost`
//!
//! Supporting enums: [`Month`] and [`HotelType`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Month
// =============================================================================

/// Calendar month of arrival.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Parse a full English month name. Case-sensitive: "July" matches, "july" does not.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Full English name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Month number, 1-12.
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

// =============================================================================
// Hotel Type
// =============================================================================

/// Hotel category as it appears in the source `hotel` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HotelType {
    Resort,
    City,
}

impl HotelType {
    /// Parse the source label ("Resort Hotel" / "City Hotel").
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Resort Hotel" => Some(Self::Resort),
            "City Hotel" => Some(Self::City),
            _ => None,
        }
    }

    /// Source label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resort => "Resort Hotel",
            Self::City => "City Hotel",
        }
    }
}

// =============================================================================
// Booking Records
// =============================================================================

/// One reservation after normalization.
///
/// `hotel` keeps the raw label; it is checked against [`HotelType`] by the
/// cost model, which is the only stage that depends on the category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    /// Zero-based position in the source table.
    pub ordinal: usize,
    pub hotel: String,
    pub is_canceled: bool,
    /// Days between booking and arrival.
    pub lead_time: u32,
    pub adults: u32,
    pub children: u32,
    pub babies: u32,
    pub stays_in_weekend_nights: u32,
    pub stays_in_week_nights: u32,
    pub arrival_date_year: i32,
    pub arrival_date_month: Month,
    pub arrival_date_day_of_month: u8,
}

/// A booking with guest and night totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedRecord {
    pub booking: BookingRecord,
    pub total_guests: u32,
    pub stay_duration: u32,
}

/// A derived booking with its join key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyedRecord {
    pub booking: BookingRecord,
    pub total_guests: u32,
    pub stay_duration: u32,
    /// SHA-256 digest, 64 lowercase hex characters.
    pub booking_id: String,
}

/// A fully enriched booking, ready for projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedRecord {
    pub booking: BookingRecord,
    pub total_guests: u32,
    pub stay_duration: u32,
    pub booking_id: String,
    /// Simulated cost in USD, rounded to cents.
    pub total_cost: f64,
}

impl EnrichedRecord {
    pub fn ordinal(&self) -> usize {
        self.booking.ordinal
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_from_name() {
        assert_eq!(Month::from_name("January"), Some(Month::January));
        assert_eq!(Month::from_name("July").map(|m| m.number()), Some(7));
        assert_eq!(Month::from_name("December").map(|m| m.number()), Some(12));
        assert_eq!(Month::from_name("july"), None);
        assert_eq!(Month::from_name("Smarch"), None);
        assert_eq!(Month::from_name(" July"), None);
    }

    #[test]
    fn test_month_numbers_are_calendar_order() {
        for (i, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.number() as usize, i + 1);
        }
    }

    #[test]
    fn test_hotel_type_from_label() {
        assert_eq!(HotelType::from_label("Resort Hotel"), Some(HotelType::Resort));
        assert_eq!(HotelType::from_label("City Hotel"), Some(HotelType::City));
        assert_eq!(HotelType::from_label("city hotel"), None);
        assert_eq!(HotelType::from_label("Motel"), None);
        assert_eq!(HotelType::City.label(), "City Hotel");
    }
}
