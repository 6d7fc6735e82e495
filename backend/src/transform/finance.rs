//! Synthetic per-booking cost model.
//!
//! ```text
//! total_cost = rate(hotel) × season(month) × stay_duration × variance
//!              × (0.20 if canceled else 1.0)
//! ```
//!
//! Variance comes from a [`VarianceSource`] owned by the simulator. The
//! pipeline uses [`SeededVariance`], a single seeded stream consumed in row
//! order, so the same input and seed always give the same costs. Tests
//! plug in [`FixedVariance`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{SimulationError, SimulationResult};
use crate::models::{EnrichedRecord, HotelType, KeyedRecord, Month};

/// Nightly rate for resort hotels, USD.
pub const RESORT_NIGHTLY_RATE: f64 = 220.0;
/// Nightly rate for city hotels, USD.
pub const CITY_NIGHTLY_RATE: f64 = 130.0;
/// July multiplier.
pub const PEAK_SEASON_MULTIPLIER: f64 = 1.35;
/// January/February multiplier.
pub const LOW_SEASON_MULTIPLIER: f64 = 0.80;
/// Share of the stay cost charged for a canceled booking.
pub const CANCELLATION_FEE_RATIO: f64 = 0.20;
/// Lower bound of the variance factor (inclusive).
pub const VARIANCE_MIN: f64 = 0.85;
/// Upper bound of the variance factor (exclusive).
pub const VARIANCE_MAX: f64 = 1.15;
/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

// =============================================================================
// Variance sources
// =============================================================================

/// Supplies one multiplicative variance factor per row.
pub trait VarianceSource {
    /// Factor for the row at `ordinal`. Called exactly once per row, in row order.
    fn factor(&mut self, ordinal: usize) -> f64;
}

/// Uniform draws in `[VARIANCE_MIN, VARIANCE_MAX)` from one seeded stream.
#[derive(Debug, Clone)]
pub struct SeededVariance {
    rng: StdRng,
}

impl SeededVariance {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededVariance {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl VarianceSource for SeededVariance {
    fn factor(&mut self, _ordinal: usize) -> f64 {
        self.rng.gen_range(VARIANCE_MIN..VARIANCE_MAX)
    }
}

/// Uniform draws where each row gets its own generator seeded from
/// `(seed, ordinal)`. The factor for a row does not depend on which other
/// rows were simulated or in what order.
#[derive(Debug, Clone, Copy)]
pub struct OrdinalVariance {
    seed: u64,
}

impl OrdinalVariance {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Sub-seed for one row (splitmix-style mixing of seed and ordinal).
    pub fn row_seed(&self, ordinal: usize) -> u64 {
        let mut z = self
            .seed
            .wrapping_add((ordinal as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl VarianceSource for OrdinalVariance {
    fn factor(&mut self, ordinal: usize) -> f64 {
        StdRng::seed_from_u64(self.row_seed(ordinal)).gen_range(VARIANCE_MIN..VARIANCE_MAX)
    }
}

/// Constant factor. Used to test the deterministic part of the model.
#[derive(Debug, Clone, Copy)]
pub struct FixedVariance(pub f64);

impl VarianceSource for FixedVariance {
    fn factor(&mut self, _ordinal: usize) -> f64 {
        self.0
    }
}

// =============================================================================
// Deterministic model
// =============================================================================

pub fn nightly_rate(hotel: HotelType) -> f64 {
    match hotel {
        HotelType::Resort => RESORT_NIGHTLY_RATE,
        HotelType::City => CITY_NIGHTLY_RATE,
    }
}

pub fn seasonal_multiplier(month: Month) -> f64 {
    match month {
        Month::July => PEAK_SEASON_MULTIPLIER,
        Month::January | Month::February => LOW_SEASON_MULTIPLIER,
        _ => 1.0,
    }
}

/// Rate × season × nights, before variance. Zero nights cost nothing.
pub fn base_stay_cost(hotel: HotelType, month: Month, nights: u32) -> f64 {
    nightly_rate(hotel) * seasonal_multiplier(month) * f64::from(nights)
}

/// Full stay cost, or the cancellation fee if canceled.
pub fn apply_cancellation(stay_cost: f64, is_canceled: bool) -> f64 {
    if is_canceled {
        stay_cost * CANCELLATION_FEE_RATIO
    } else {
        stay_cost
    }
}

/// Round to cent precision.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Simulator
// =============================================================================

/// Computes `total_cost` for keyed records using its own variance source.
#[derive(Debug, Clone)]
pub struct FinancialSimulator<V = SeededVariance> {
    variance: V,
}

impl FinancialSimulator<SeededVariance> {
    /// Simulator backed by a fresh stream seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededVariance::new(seed))
    }
}

impl<V: VarianceSource> FinancialSimulator<V> {
    pub fn new(variance: V) -> Self {
        Self { variance }
    }

    /// Cost one record. Draws exactly one variance factor.
    pub fn simulate(&mut self, record: KeyedRecord) -> SimulationResult<EnrichedRecord> {
        let b = &record.booking;
        let hotel =
            HotelType::from_label(&b.hotel).ok_or_else(|| SimulationError::UnknownHotelType {
                ordinal: b.ordinal,
                value: b.hotel.clone(),
            })?;

        let factor = self.variance.factor(b.ordinal);
        let stay_cost = base_stay_cost(hotel, b.arrival_date_month, record.stay_duration) * factor;
        let total_cost = round_cents(apply_cancellation(stay_cost, b.is_canceled)).max(0.0);

        Ok(EnrichedRecord {
            booking: record.booking,
            total_guests: record.total_guests,
            stay_duration: record.stay_duration,
            booking_id: record.booking_id,
            total_cost,
        })
    }

    /// Cost every record in order. Stops at the first unknown hotel.
    pub fn simulate_all(
        &mut self,
        records: Vec<KeyedRecord>,
    ) -> SimulationResult<Vec<EnrichedRecord>> {
        let enriched = records
            .into_iter()
            .map(|r| self.simulate(r))
            .collect::<SimulationResult<Vec<_>>>()?;
        debug!(rows = enriched.len(), "simulated booking costs");
        Ok(enriched)
    }
}
