//! Join key generation.
//!
//! `booking_id` is the SHA-256 digest of `ordinal|lead_time|year|day`,
//! rendered as lowercase hex. The three domain fields collide across the
//! dataset; the ordinal makes every key distinct by construction.

use sha2::{Digest, Sha256};

use crate::models::{DerivedRecord, KeyedRecord};

/// Separator between key components. Never appears in integer fields.
pub const KEY_DELIMITER: char = '|';

/// Length of a rendered key (256 bits as hex).
pub const KEY_HEX_LEN: usize = 64;

/// Compute the join key for one row. Pure and deterministic.
pub fn booking_id(ordinal: usize, lead_time: u32, year: i32, day_of_month: u8) -> String {
    let composite = format!(
        "{ordinal}{d}{lead_time}{d}{year}{d}{day_of_month}",
        d = KEY_DELIMITER
    );
    let mut hasher = Sha256::new();
    hasher.update(composite.as_bytes());
    hex::encode(hasher.finalize())
}

/// Attach a key to one derived record.
pub fn assign_key(record: DerivedRecord) -> KeyedRecord {
    let b = &record.booking;
    let booking_id = booking_id(
        b.ordinal,
        b.lead_time,
        b.arrival_date_year,
        b.arrival_date_day_of_month,
    );
    KeyedRecord {
        booking: record.booking,
        total_guests: record.total_guests,
        stay_duration: record.stay_duration,
        booking_id,
    }
}

/// Key every record, preserving order.
pub fn assign_keys(records: Vec<DerivedRecord>) -> Vec<KeyedRecord> {
    records.into_iter().map(assign_key).collect()
}
