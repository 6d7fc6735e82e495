//! CSV export of the audited views.
//!
//! Every view is written to a temporary file in the output directory and
//! only renamed to `<view>.csv` once all views have been written and
//! flushed. A failure part-way leaves no half-written `<view>.csv`; the
//! temp files are removed when dropped. Each rename is atomic on its own,
//! but the three renames together are not a single transaction.

pub mod views;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ExportError, ExportResult};
use views::{Cell, View};

pub use views::{project_all, ViewRow};

/// Write all views into `out_dir`, returning the final paths in view order.
pub fn export_views(views: &[View], out_dir: &Path) -> ExportResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(views.len());
    for view in views {
        let target = out_dir.join(view.file_name());
        let temp = write_temp(view, out_dir)?;
        debug!(view = view.name, rows = view.rows.len(), "staged view");
        staged.push((temp, target));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (temp, target) in staged {
        temp.persist(&target).map_err(|e| ExportError::Persist {
            path: target.clone(),
            source: e.error,
        })?;
        info!(path = %target.display(), "wrote view");
        written.push(target);
    }

    Ok(written)
}

fn write_temp(view: &View, out_dir: &Path) -> ExportResult<NamedTempFile> {
    let io_err = |source| ExportError::Io {
        path: out_dir.join(view.file_name()),
        source,
    };
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", view.name))
        .suffix(".csv.tmp")
        .tempfile_in(out_dir)
        .map_err(io_err)?;

    write_csv(view, &mut temp, &out_dir.join(view.file_name()))?;
    temp.as_file().sync_all().map_err(io_err)?;

    Ok(temp)
}

/// Render one view to an in-memory CSV string. Same format as the files.
pub fn render_view(view: &View) -> ExportResult<String> {
    let mut bytes = Vec::new();
    write_csv(view, &mut bytes, Path::new(&view.file_name()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_csv<W: Write>(view: &View, sink: W, path: &Path) -> ExportResult<()> {
    let csv_err = |source| ExportError::Csv {
        view: view.name.to_string(),
        source,
    };

    let mut writer = WriterBuilder::new().from_writer(sink);
    writer.write_record(view.columns).map_err(csv_err)?;
    for row in &view.rows {
        writer
            .write_record(row.cells.iter().map(Cell::render))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
