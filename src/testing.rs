//! Fixtures shared by unit tests.

use std::path::Path;

use chrono::{Duration, NaiveDate};

use crate::config::ColumnConfig;
use crate::model::{Trajectory, TrajectoryPoint};
use crate::store;

/// Track heading north-east one minute per fix, with the given speeds and labels.
pub(crate) fn track(sogs: &[f64], labels: &[Option<&str>]) -> Trajectory {
    assert_eq!(sogs.len(), labels.len());
    let t0 = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .unwrap();
    let points = sogs
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (&sog, label))| TrajectoryPoint {
            timestamp: t0 + Duration::minutes(i as i64),
            latitude: 43.0 + i as f64 * 0.01,
            longitude: -9.0 + i as f64 * 0.02,
            speed_over_ground: sog,
            heading: (i as f64 * 30.0) % 360.0,
            label: label.map(str::to_string),
        })
        .collect();
    store::from_points("ESP000001", Path::new("track.csv"), points, &ColumnConfig::default())
        .unwrap()
}

/// `n` unlabeled fixes at 3 knots.
pub(crate) fn unlabeled(n: usize) -> Trajectory {
    track(&vec![3.0; n], &vec![None; n])
}
