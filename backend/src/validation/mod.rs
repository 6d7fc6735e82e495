//! Pre-export audit.
//!
//! Two gates run before anything is written:
//!
//! 1. **Null audit**: every cell of every row of every view must be
//!    present and non-null (see [`Cell::is_null`]).
//! 2. **Key audit**: every `booking_id` must be distinct.
//!
//! Either failure aborts the run.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AuditError, AuditResult};
use crate::export::views::{Cell, View};
use crate::models::EnrichedRecord;

/// Audit outcome for one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewAudit {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub nulls: usize,
}

/// Audit outcome for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub views: Vec<ViewAudit>,
    pub unique_ids: usize,
}

/// Count null cells in a view. Short rows count each absent cell as null.
pub fn count_nulls(view: &View) -> usize {
    view.rows
        .iter()
        .map(|row| {
            (0..view.columns.len())
                .filter(|&i| row.cells.get(i).map_or(true, Cell::is_null))
                .count()
        })
        .sum()
}

/// Fail on the first null cell in `view`.
pub fn audit_view(view: &View) -> AuditResult<ViewAudit> {
    for row in &view.rows {
        for (i, column) in view.columns.iter().enumerate() {
            if row.cells.get(i).map_or(true, Cell::is_null) {
                return Err(AuditError::NullValue {
                    view: view.name.to_string(),
                    column: (*column).to_string(),
                    ordinal: row.ordinal,
                });
            }
        }
    }

    Ok(ViewAudit {
        name: view.name.to_string(),
        rows: view.rows.len(),
        columns: view.columns.len(),
        nulls: 0,
    })
}

/// Null-audit all views in order.
pub fn audit_nulls(views: &[View]) -> AuditResult<Vec<ViewAudit>> {
    let mut audits = Vec::with_capacity(views.len());
    for view in views {
        let audit = audit_view(view)?;
        info!(
            view = %audit.name,
            rows = audit.rows,
            nulls = audit.nulls,
            "null audit passed"
        );
        audits.push(audit);
    }
    Ok(audits)
}

/// Fail if two records share a `booking_id`. Returns the unique count.
pub fn audit_unique_keys(records: &[EnrichedRecord]) -> AuditResult<usize> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(&first) = seen.get(record.booking_id.as_str()) {
            return Err(AuditError::DuplicateKey {
                booking_id: record.booking_id.clone(),
                first,
                second: record.ordinal(),
            });
        }
        seen.insert(&record.booking_id, record.ordinal());
    }
    debug!(unique_ids = seen.len(), "key audit passed");
    Ok(seen.len())
}

/// Run both audits.
pub fn audit(records: &[EnrichedRecord], views: &[View]) -> AuditResult<AuditSummary> {
    let views = audit_nulls(views)?;
    let unique_ids = audit_unique_keys(records)?;
    Ok(AuditSummary { views, unique_ids })
}
