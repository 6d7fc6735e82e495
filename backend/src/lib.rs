//! # Hotel ontology - booking extract pipeline
//!
//! Turns the flat hotel bookings CSV into three normalized, null-free
//! extracts joined on a SHA-256 `booking_id`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌─────────┐   ┌─────────┐   ┌─────────┐   ┌───────┐   ┌─────────┐
//! │ CSV File │──▶│ Normalize │──▶│ Derive  │──▶│  Keys   │──▶│ Finance │──▶│ Audit │──▶│ Export  │
//! │ (32 col) │   │ (month,NA)│   │ (sums)  │   │ (sha256)│   │ (seeded)│   │(nulls)│   │ (3 CSV) │
//! └──────────┘   └───────────┘   └─────────┘   └─────────┘   └─────────┘   └───────┘   └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hotel_ontology::{run, PipelineOptions};
//!
//! let report = run(&PipelineOptions::default()).unwrap();
//! println!("Wrote {:?}", report.outputs);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Stage error types
//! - [`models`] - Booking record types
//! - [`parser`] - Source table loading
//! - [`transform`] - Normalize, derive, key, simulate, pipeline
//! - [`validation`] - Null and key audits
//! - [`export`] - View projection and atomic CSV export
//! - [`logging`] - `tracing` subscriber setup

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Export
pub mod export;

// Logging
pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AuditError, ExportError, LoadError, NormalizeError, PipelineError, SimulationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{BookingRecord, DerivedRecord, EnrichedRecord, HotelType, KeyedRecord, Month};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{load_table, parse_table, read_table, RawTable, REQUIRED_COLUMNS, SOURCE_COLUMNS};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use transform::{
    assign_keys, booking_id, derive_all, normalize, FinancialSimulator, FixedVariance,
    OrdinalVariance, SeededVariance, VarianceSource,
};

// =============================================================================
// Re-exports - Audit and export
// =============================================================================

pub use export::views::{project_all, Cell, View};
pub use export::{export_views, render_view};
pub use validation::{audit, AuditSummary, ViewAudit};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    dry_run, enrich_table, enrich_with, load_source, run, AuditReport, Enrichment,
    PipelineOptions, PipelineReport, SourceInfo,
};
