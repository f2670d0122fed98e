use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;

use crate::error::{LabelkitError, Result};

/// One GPS fix of a vessel track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_over_ground: f64,
    pub heading: f64,
    /// `None` means unlabeled. Never an empty string.
    pub label: Option<String>,
}

impl TrajectoryPoint {
    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }
}

/// Ordered track of a single vessel, as loaded from one source file.
///
/// The source table is kept verbatim (every column as a string) so that a
/// write-back reproduces columns the labeling core never interprets.
#[derive(Debug, Clone)]
pub struct Trajectory {
    vessel_key: String,
    source: PathBuf,
    points: Vec<TrajectoryPoint>,
    frame: DataFrame,
    label_column: String,
}

impl Trajectory {
    pub(crate) fn from_parts(
        vessel_key: String,
        source: PathBuf,
        points: Vec<TrajectoryPoint>,
        frame: DataFrame,
        label_column: String,
    ) -> Self {
        Self {
            vessel_key,
            source,
            points,
            frame,
            label_column,
        }
    }

    pub fn vessel_key(&self) -> &str {
        &self.vessel_key
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [TrajectoryPoint] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Source table as loaded, label column included.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Source table with the label column replaced by the in-memory labels.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let labels: Vec<Option<&str>> = self.points.iter().map(|p| p.label.as_deref()).collect();
        let mut df = self.frame.clone();
        df.with_column(Series::new(self.label_column.as_str().into(), labels))?;
        Ok(df)
    }
}

/// A label chosen by the analyst. Any non-blank string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LabelCategory(String);

impl LabelCategory {
    pub fn new(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LabelkitError::LabelValidation(
                "label category must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for LabelCategory {
    type Error = LabelkitError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

/// Option list offered to the analyst, first occurrence wins on duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelOptions(Vec<String>);

impl LabelOptions {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let unique = options
            .into_iter()
            .map(|o| o.as_ref().trim().to_string())
            .filter(|o| !o.is_empty() && seen.insert(o.clone()))
            .collect();
        Self(unique)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, category: &LabelCategory) -> bool {
        self.0.iter().any(|o| o == category.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
