use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{LabelkitError, Result};
use crate::model::Trajectory;
use crate::store::read_csv_as_strings;

const OVERLAY_SUFFIX: &str = "__current";

/// Positional, field-level merge of the in-memory table onto the persisted one.
///
/// Row i starts from `persisted` row i; every non-null field of `current`
/// row i replaces the persisted value. Columns only in `persisted` are kept,
/// columns only in `current` are appended. Without a persisted table the
/// result is `current` unchanged.
///
/// Both tables come from the same source file, so a height mismatch means
/// the file changed underneath us and is reported instead of resolved.
pub fn merge(current: &DataFrame, persisted: Option<&DataFrame>) -> Result<DataFrame> {
    let Some(persisted) = persisted else {
        return Ok(current.clone());
    };
    if persisted.height() != current.height() {
        return Err(LabelkitError::PersistenceSchema(format!(
            "persisted table has {} rows, in-memory trajectory has {}",
            persisted.height(),
            current.height()
        )));
    }

    // Overlay columns ride along under a suffixed name until they are folded in.
    let overlay_name = |name: &str| format!("{}{}", name, OVERLAY_SUFFIX);
    let overlays: Vec<Column> = current
        .get_columns()
        .iter()
        .map(|c| -> Result<Column> {
            Ok(c.cast(&DataType::String)?
                .with_name(overlay_name(c.name().as_str()).into()))
        })
        .collect::<Result<_>>()?;
    let mut joined = persisted.clone();
    joined.hstack_mut(&overlays)?;

    let mut folded = Vec::with_capacity(overlays.len());
    let mut output: Vec<Expr> = persisted
        .get_column_names_str()
        .iter()
        .map(|c| col(*c))
        .collect();
    for name in current.get_column_names_str() {
        let overlay = col(overlay_name(name));
        if persisted.column(name).is_ok() {
            folded.push(
                when(overlay.clone().is_not_null())
                    .then(overlay)
                    .otherwise(col(name).cast(DataType::String))
                    .alias(name),
            );
        } else {
            debug!(column = name, "column not persisted yet, appending");
            folded.push(overlay.alias(name));
            output.push(col(name));
        }
    }

    let merged = joined.lazy().with_columns(folded).select(output).collect()?;
    Ok(merged)
}

/// Merge the trajectory into its own source file and write it back.
pub fn save(trajectory: &Trajectory) -> Result<DataFrame> {
    save_to(trajectory, trajectory.source())
}

/// Merge the trajectory into whatever is stored at `path` and write the result.
///
/// Nothing is written when the merge fails. There is no locking: a writer
/// that changes the file between load and save without changing its row
/// count is overlaid, not detected.
pub fn save_to(trajectory: &Trajectory, path: &Path) -> Result<DataFrame> {
    let current = trajectory.to_frame()?;
    let persisted = if path.exists() {
        Some(read_csv_as_strings(path)?)
    } else {
        None
    };

    let mut merged = merge(&current, persisted.as_ref()).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "save aborted");
    })?;
    write_csv_atomic(&mut merged, path)?;

    info!(
        path = %path.display(),
        vessel = trajectory.vessel_key(),
        rows = merged.height(),
        "saved labels"
    );
    Ok(merged)
}

/// Write next to the target and rename, so readers never see a half-written file.
fn write_csv_atomic(df: &mut DataFrame, path: &Path) -> Result<()> {
    let tmp = temp_path(path);
    let written = File::create(&tmp)
        .map_err(LabelkitError::from)
        .and_then(|mut file| {
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
            file.sync_all()?;
            Ok(())
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "trajectory.csv".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
