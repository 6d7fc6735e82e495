//! Guest and night totals.

use crate::models::{BookingRecord, DerivedRecord};

/// Add `total_guests` and `stay_duration` to one booking.
///
/// Sums saturate at `u32::MAX`.
pub fn derive_record(booking: BookingRecord) -> DerivedRecord {
    let total_guests = booking
        .adults
        .saturating_add(booking.children)
        .saturating_add(booking.babies);
    let stay_duration = booking
        .stays_in_weekend_nights
        .saturating_add(booking.stays_in_week_nights);

    DerivedRecord {
        booking,
        total_guests,
        stay_duration,
    }
}

/// Derive totals for every booking, preserving order.
pub fn derive_all(bookings: Vec<BookingRecord>) -> Vec<DerivedRecord> {
    bookings.into_iter().map(derive_record).collect()
}
