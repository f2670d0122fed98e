use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::debug;

use crate::error::{LabelkitError, Result};
use crate::model::Trajectory;

/// Inclusive window of row indices, always valid for the trajectory it was
/// selected against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionRange {
    start: usize,
    end: usize,
}

impl SelectionRange {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of rows in the window (never zero).
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Re-check against a trajectory; guards ranges carried over from another file.
    pub fn ensure_within(&self, trajectory: &Trajectory) -> Result<()> {
        if self.end >= trajectory.len() {
            return Err(LabelkitError::InvalidRange {
                start: self.start as i64,
                end: self.end as i64,
                len: trajectory.len(),
            });
        }
        Ok(())
    }
}

/// Clamp `[start, end]` into `[0, len - 1]`.
///
/// `start` defaults to 0 and `end` to `min(len - 1, window - 1)`.
/// Fails when the trajectory is empty or when `start > end` after clamping.
pub fn select(
    trajectory: &Trajectory,
    start: Option<i64>,
    end: Option<i64>,
    window: usize,
) -> Result<SelectionRange> {
    select_len(trajectory.len(), start, end, window)
}

pub(crate) fn select_len(
    len: usize,
    start: Option<i64>,
    end: Option<i64>,
    window: usize,
) -> Result<SelectionRange> {
    let invalid = |s: i64, e: i64| LabelkitError::InvalidRange {
        start: s,
        end: e,
        len,
    };
    if len == 0 {
        return Err(invalid(start.unwrap_or(0), end.unwrap_or(0)));
    }

    let last = (len - 1) as i64;
    let default_end = last.min(window.max(1) as i64 - 1);
    let start = start.unwrap_or(0).clamp(0, last);
    let end = end.unwrap_or(default_end).clamp(0, last);
    if start > end {
        return Err(invalid(start, end));
    }

    debug!(start, end, len, "selected range");
    Ok(SelectionRange {
        start: start as usize,
        end: end as usize,
    })
}
