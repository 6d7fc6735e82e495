//! Error types for the booking extract pipeline.
//!
//! Every stage has its own error enum, and all of them roll up into
//! [`PipelineError`]:
//!
//! - [`LoadError`] - unreadable or malformed source table
//! - [`NormalizeError`] - bad month names, non-integer or missing values
//! - [`SimulationError`] - unknown hotel category
//! - [`AuditError`] - residual nulls or duplicate join keys
//! - [`ExportError`] - write failures
//!
//! `From` conversions let `?` cross stage boundaries. Row-level variants
//! carry the zero-based row ordinal so a failure can be located in a
//! 100k-row file.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while reading the source table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to open or read the file.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no header row.
    #[error("Source table has no header row")]
    MissingHeader,

    /// A record has a different number of fields than the header.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    ColumnCountMismatch {
        line: u64,
        expected: u64,
        found: u64,
    },

    /// A column the pipeline reads is absent from the header.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The configured delimiter is not a single ASCII character.
    #[error("Delimiter '{0}' is not an ASCII character")]
    InvalidDelimiter(char),

    /// Any other CSV syntax error.
    #[error("Invalid CSV: {0}")]
    Csv(#[source] csv::Error),
}

// =============================================================================
// Normalization Errors
// =============================================================================

/// Errors while turning raw rows into typed booking records.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// `arrival_date_month` is not one of the twelve English month names.
    #[error("Row {ordinal}: invalid arrival month '{value}'")]
    InvalidMonth { ordinal: usize, value: String },

    /// A numeric column holds something that is not an integer.
    #[error("Row {ordinal}, column '{column}': '{value}' is not a valid integer")]
    InvalidInteger {
        ordinal: usize,
        column: String,
        value: String,
    },

    /// A required column is empty and has no documented fill value.
    #[error("Row {ordinal}, column '{column}': value is missing")]
    MissingValue { ordinal: usize, column: String },
}

// =============================================================================
// Simulation Errors
// =============================================================================

/// Errors from the cost model.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The hotel category has no base rate.
    #[error("Row {ordinal}: unknown hotel type '{value}'")]
    UnknownHotelType { ordinal: usize, value: String },
}

// =============================================================================
// Audit Errors
// =============================================================================

/// Pre-export audit failures.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A projected cell is null.
    #[error("[{view}] null value in column '{column}' at row {ordinal}")]
    NullValue {
        view: String,
        column: String,
        ordinal: usize,
    },

    /// Two rows share a join key.
    #[error("Duplicate booking_id {booking_id} at rows {first} and {second}")]
    DuplicateKey {
        booking_id: String,
        first: usize,
        second: usize,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing output views.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem failure (temp file creation, flush, directory access).
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failure.
    #[error("Failed to serialize view '{view}': {source}")]
    Csv {
        view: String,
        #[source]
        source: csv::Error,
    },

    /// Atomic rename of the finished temp file failed.
    #[error("Failed to move finished file into '{}': {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result type for cost simulation.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Result type for the audit.
pub type AuditResult<T> = Result<T, AuditError>;

/// Result type for export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for a full pipeline run.
pub type PipelineResult<T> = Result<T, PipelineError>;
