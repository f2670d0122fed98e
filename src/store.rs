use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ColumnConfig, LabelingConfig};
use crate::error::{LabelkitError, Result};
use crate::model::{Trajectory, TrajectoryPoint};

// ── Loading ─────────────────────────────────────────────────────────────────

/// Load a trajectory CSV.
///
/// Required columns (names from `config.columns`):
///     vessel key, timestamp, latitude, longitude, speed over ground, heading
/// Optional: label. A missing label column is synthesized as all-null.
/// Every other column is carried along untouched.
pub fn load(path: &Path, config: &LabelingConfig) -> Result<Trajectory> {
    let mut frame = read_csv_as_strings(path)
        .map_err(|e| LabelkitError::Load(format!("{}: {}", path.display(), e)))?;
    require_columns(&frame, &config.columns.required())?;

    let label_col = config.columns.label.as_str();
    if frame.column(label_col).is_err() {
        debug!(path = %path.display(), "no label column, synthesizing an unset one");
        frame.with_column(Series::full_null(
            label_col.into(),
            frame.height(),
            &DataType::String,
        ))?;
    }

    let trajectory = trajectory_from_frame(frame, path, config)?;
    info!(
        path = %path.display(),
        vessel = trajectory.vessel_key(),
        points = trajectory.len(),
        "loaded trajectory"
    );
    Ok(trajectory)
}

/// Build a trajectory from an all-string table that already has a label column.
pub(crate) fn trajectory_from_frame(
    frame: DataFrame,
    source: &Path,
    config: &LabelingConfig,
) -> Result<Trajectory> {
    let cols = &config.columns;
    let n = frame.height();

    let vessel_key = vessel_key(&frame, cols, source)?;
    let timestamps = parse_timestamps(&frame, &cols.timestamp, &config.timestamp_formats)?;
    let numeric = parse_floats(
        &frame,
        &[
            cols.latitude.as_str(),
            cols.longitude.as_str(),
            cols.speed_over_ground.as_str(),
            cols.heading.as_str(),
        ],
    )?;
    let lat = numeric.column(&cols.latitude)?.f64()?;
    let lon = numeric.column(&cols.longitude)?.f64()?;
    let sog = numeric.column(&cols.speed_over_ground)?.f64()?;
    let heading = numeric.column(&cols.heading)?.f64()?;
    let labels = frame.column(&cols.label)?.str()?;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let speed_over_ground = sog.get(i).unwrap_or(0.0);
        if speed_over_ground < 0.0 {
            return Err(LabelkitError::Load(format!(
                "negative {} ({}) at row {}",
                cols.speed_over_ground, speed_over_ground, i
            )));
        }
        if i > 0 && timestamps[i] < timestamps[i - 1] {
            return Err(LabelkitError::Load(format!(
                "timestamps decrease at row {} ({} after {})",
                i,
                timestamps[i],
                timestamps[i - 1]
            )));
        }
        points.push(TrajectoryPoint {
            timestamp: timestamps[i],
            latitude: lat.get(i).unwrap_or(0.0),
            longitude: lon.get(i).unwrap_or(0.0),
            speed_over_ground,
            heading: heading.get(i).unwrap_or(0.0),
            label: labels.get(i).map(|s| s.to_string()),
        });
    }

    Ok(Trajectory::from_parts(
        vessel_key,
        source.to_path_buf(),
        points,
        frame,
        cols.label.clone(),
    ))
}

/// Build a trajectory from typed points, e.g. for tracks that never lived in a CSV.
/// The backing table uses the configured header names.
pub fn from_points(
    vessel_key: &str,
    source: &Path,
    points: Vec<TrajectoryPoint>,
    columns: &ColumnConfig,
) -> Result<Trajectory> {
    let labels: Vec<Option<&str>> = points.iter().map(|p| p.label.as_deref()).collect();
    let frame = DataFrame::new(vec![
        text_column(&columns.vessel_key, &points, |_| vessel_key.to_string()),
        text_column(&columns.timestamp, &points, |p| p.timestamp.to_string()),
        text_column(&columns.latitude, &points, |p| p.latitude.to_string()),
        text_column(&columns.longitude, &points, |p| p.longitude.to_string()),
        text_column(&columns.speed_over_ground, &points, |p| {
            p.speed_over_ground.to_string()
        }),
        text_column(&columns.heading, &points, |p| p.heading.to_string()),
        Series::new(columns.label.as_str().into(), labels).into(),
    ])?;

    Ok(Trajectory::from_parts(
        vessel_key.to_string(),
        source.to_path_buf(),
        points,
        frame,
        columns.label.clone(),
    ))
}

/// List trajectory files in `dir` with the given extension, sorted by path.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

// ── Coverage ────────────────────────────────────────────────────────────────

/// Labeling progress of one trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStats {
    pub total_rows: usize,
    pub labeled_rows: usize,
    pub labeled_percentage: f64,
    /// Row count per label value.
    pub by_label: BTreeMap<String, usize>,
}

impl fmt::Display for CoverageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} rows labeled ({:.2}%)",
            self.labeled_rows, self.total_rows, self.labeled_percentage
        )
    }
}

pub fn coverage(trajectory: &Trajectory) -> CoverageStats {
    let total_rows = trajectory.len();
    let mut by_label: BTreeMap<String, usize> = BTreeMap::new();
    for label in trajectory.points().iter().filter_map(|p| p.label.as_ref()) {
        *by_label.entry(label.clone()).or_default() += 1;
    }
    let labeled_rows = by_label.values().sum();
    let labeled_percentage = if total_rows > 0 {
        labeled_rows as f64 / total_rows as f64 * 100.0
    } else {
        0.0
    };
    CoverageStats {
        total_rows,
        labeled_rows,
        labeled_percentage,
        by_label,
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
pub(crate) fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;
    Ok(df)
}

fn text_column(
    name: &str,
    points: &[TrajectoryPoint],
    value: impl Fn(&TrajectoryPoint) -> String,
) -> Column {
    let values: Vec<String> = points.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(LabelkitError::Load(format!(
                "missing required column '{}'",
                col_name
            )));
        }
    }
    Ok(())
}

/// All rows must name the same vessel. An empty file is keyed by its stem.
fn vessel_key(frame: &DataFrame, cols: &ColumnConfig, source: &Path) -> Result<String> {
    let keys = frame.column(&cols.vessel_key)?.str()?;
    let mut vessel: Option<&str> = None;
    for (i, key) in keys.into_iter().enumerate() {
        let key = key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(|| {
            LabelkitError::Load(format!("missing {} at row {}", cols.vessel_key, i))
        })?;
        match vessel {
            None => vessel = Some(key),
            Some(v) if v != key => {
                return Err(LabelkitError::Load(format!(
                    "row {} belongs to vessel '{}', expected '{}'",
                    i, key, v
                )))
            }
            Some(_) => {}
        }
    }
    Ok(match vessel {
        Some(v) => v.to_string(),
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
    })
}

/// Cast string columns to Float64; any null afterwards is a load error.
fn parse_floats(frame: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let exprs: Vec<Expr> = columns
        .iter()
        .map(|c| {
            col(*c)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .cast(DataType::Float64)
        })
        .collect();
    let parsed = frame
        .clone()
        .lazy()
        .select(exprs)
        .collect()
        .map_err(|e| LabelkitError::Load(e.to_string()))?;

    for &c in columns {
        let null_count = parsed.column(c)?.null_count();
        if null_count > 0 {
            return Err(LabelkitError::Load(format!(
                "column '{}' has {} missing or non-numeric values",
                c, null_count
            )));
        }
    }
    Ok(parsed)
}

fn parse_timestamps(frame: &DataFrame, column: &str, formats: &[String]) -> Result<Vec<NaiveDateTime>> {
    frame
        .column(column)?
        .str()?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            raw.and_then(|s| parse_timestamp(s.trim(), formats))
                .ok_or_else(|| {
                    LabelkitError::Load(format!(
                        "unparseable {} at row {}: {:?}",
                        column,
                        i,
                        raw.unwrap_or("")
                    ))
                })
        })
        .collect()
}

/// RFC 3339 first (normalized to UTC), then each configured format, then a bare date.
pub(crate) fn parse_timestamp(s: &str, formats: &[String]) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    formats
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
