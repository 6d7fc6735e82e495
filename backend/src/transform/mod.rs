//! Transformation module.
//!
//! Record-in/record-out stages, in pipeline order:
//! - normalize: raw rows to typed bookings
//! - derive: guest and night totals
//! - keys: `booking_id` join keys
//! - finance: simulated `total_cost`
//! - pipeline: end-to-end orchestration

pub mod derive;
pub mod finance;
pub mod keys;
pub mod normalize;
pub mod pipeline;

pub use derive::{derive_all, derive_record};
pub use finance::{
    FinancialSimulator, FixedVariance, OrdinalVariance, SeededVariance, VarianceSource,
};
pub use keys::{assign_key, assign_keys, booking_id};
pub use normalize::{normalize, Normalized};
pub use pipeline::*;
