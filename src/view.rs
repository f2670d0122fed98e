/// View projection: derives everything the map, table and timeline need
/// from one trajectory snapshot and one selection window.
///
/// Every function here is pure. Views are rebuilt from scratch after each
/// interaction so the three of them can never disagree about which
/// adjacent pairs are confirmed.
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::model::{Trajectory, TrajectoryPoint};
use crate::schema::{color, motion};
use crate::selection::SelectionRange;
use crate::store::{coverage, CoverageStats};

// ── Colours ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Blue,
    Green,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => color::BLACK,
            Color::Red => color::RED,
            Color::Blue => color::BLUE,
            Color::Green => color::GREEN,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker colour from speed over ground.
///
/// Stopped is black, 0.1..=5 knots is red, everything else is blue. Speeds
/// strictly between 0 and 0.1 are blue as well.
pub fn motion_color(speed_over_ground: f64) -> Color {
    if speed_over_ground == 0.0 {
        Color::Black
    } else if (motion::SLOW_MIN_SOG..=motion::SLOW_MAX_SOG).contains(&speed_over_ground) {
        Color::Red
    } else {
        Color::Blue
    }
}

/// Green only when both endpoints carry a label.
pub fn segment_color(from: &TrajectoryPoint, to: &TrajectoryPoint) -> Color {
    if from.is_labeled() && to.is_labeled() {
        Color::Green
    } else {
        Color::Blue
    }
}

// ── View-model pieces ───────────────────────────────────────────────────────

/// `[[min_lat, min_lon], [max_lat, max_lon]]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundingBox(pub [[f64; 2]; 2]);

impl BoundingBox {
    pub fn south_west(&self) -> [f64; 2] {
        self.0[0]
    }

    pub fn north_east(&self) -> [f64; 2] {
        self.0[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// Glyph rotation about the anchor, degrees clockwise from north.
    pub rotation_deg: f64,
    pub color: Color,
    pub caption: String,
}

impl MapMarker {
    /// Rotated triangle with the row index printed underneath.
    pub fn glyph_html(&self) -> String {
        format!(
            r#"<div style="transform: rotate({rotation}deg);"><svg width="20" height="20" viewBox="0 0 100 100"><polygon points="50,10 70,70 30,70" style="fill:{fill};stroke:black;stroke-width:2" /></svg></div><div style="color: black; font-size: 12px; text-align: center;">{caption}</div>"#,
            rotation = self.rotation_deg,
            fill = self.color,
            caption = self.caption,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSegment {
    pub from_index: usize,
    pub to_index: usize,
    /// `[[lat, lon], [lat, lon]]`
    pub path: [[f64; 2]; 2],
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSample {
    pub index: usize,
    pub sog: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSegment {
    pub from_index: usize,
    pub to_index: usize,
    pub sog: [f64; 2],
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub samples: Vec<TimelineSample>,
    pub segments: Vec<TimelineSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub index: usize,
    #[serde(flatten)]
    pub point: TrajectoryPoint,
}

/// Immutable snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub vessel_key: String,
    pub selection: SelectionRange,
    pub bounds: BoundingBox,
    pub table: Vec<TableRow>,
    pub markers: Vec<MapMarker>,
    pub segments: Vec<MapSegment>,
    pub timeline: Timeline,
    pub coverage: CoverageStats,
}

impl ViewModel {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ── Projection ──────────────────────────────────────────────────────────────

/// Build the full snapshot for `range`.
pub fn project(trajectory: &Trajectory, range: SelectionRange) -> Result<ViewModel> {
    range.ensure_within(trajectory)?;
    Ok(ViewModel {
        vessel_key: trajectory.vessel_key().to_string(),
        selection: range,
        bounds: bounding_box(trajectory, range),
        table: table(trajectory, range),
        markers: markers(trajectory, range),
        segments: segments(trajectory, range),
        timeline: timeline(trajectory, range),
        coverage: coverage(trajectory),
    })
}

/// Window rows paired with their indices. The range must be valid for
/// `trajectory`; `project` checks that.
fn window(
    trajectory: &Trajectory,
    range: SelectionRange,
) -> impl Iterator<Item = (usize, &TrajectoryPoint)> + '_ {
    trajectory.points()[range.indices()]
        .iter()
        .enumerate()
        .map(move |(offset, p)| (range.start() + offset, p))
}

/// Adjacent pairs inside the window only.
fn pairs(
    trajectory: &Trajectory,
    range: SelectionRange,
) -> impl Iterator<Item = (usize, &TrajectoryPoint, &TrajectoryPoint)> + '_ {
    trajectory.points()[range.indices()]
        .windows(2)
        .enumerate()
        .map(move |(offset, w)| (range.start() + offset, &w[0], &w[1]))
}

/// Bounds of the selected window, not of the whole track.
pub fn bounding_box(trajectory: &Trajectory, range: SelectionRange) -> BoundingBox {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for (_, p) in window(trajectory, range) {
        min[0] = min[0].min(p.latitude);
        min[1] = min[1].min(p.longitude);
        max[0] = max[0].max(p.latitude);
        max[1] = max[1].max(p.longitude);
    }
    BoundingBox([min, max])
}

pub fn table(trajectory: &Trajectory, range: SelectionRange) -> Vec<TableRow> {
    window(trajectory, range)
        .map(|(index, p)| TableRow {
            index,
            point: p.clone(),
        })
        .collect()
}

pub fn markers(trajectory: &Trajectory, range: SelectionRange) -> Vec<MapMarker> {
    window(trajectory, range)
        .map(|(index, p)| MapMarker {
            index,
            latitude: p.latitude,
            longitude: p.longitude,
            rotation_deg: p.heading,
            color: motion_color(p.speed_over_ground),
            caption: index.to_string(),
        })
        .collect()
}

pub fn segments(trajectory: &Trajectory, range: SelectionRange) -> Vec<MapSegment> {
    pairs(trajectory, range)
        .map(|(i, a, b)| MapSegment {
            from_index: i,
            to_index: i + 1,
            path: [[a.latitude, a.longitude], [b.latitude, b.longitude]],
            color: segment_color(a, b),
        })
        .collect()
}

/// SOG against row index, coloured with the same rule as the map lines.
///
/// A sample takes the colour of the segment leaving it; the last sample
/// takes the colour of the segment entering it. A lone sample is blue.
pub fn timeline(trajectory: &Trajectory, range: SelectionRange) -> Timeline {
    let segments: Vec<TimelineSegment> = pairs(trajectory, range)
        .map(|(i, a, b)| TimelineSegment {
            from_index: i,
            to_index: i + 1,
            sog: [a.speed_over_ground, b.speed_over_ground],
            color: segment_color(a, b),
        })
        .collect();

    let samples = window(trajectory, range)
        .enumerate()
        .map(|(offset, (index, p))| {
            let color = segments
                .get(offset)
                .or_else(|| segments.last())
                .map(|s| s.color)
                .unwrap_or(Color::Blue);
            TimelineSample {
                index,
                sog: p.speed_over_ground,
                color,
            }
        })
        .collect();

    Timeline { samples, segments }
}
