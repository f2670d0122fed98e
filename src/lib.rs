//! Segment labeling for vessel GPS trajectories.
//!
//! Load a track, select an index window, label it, and merge the labels back
//! into the source CSV without touching rows labeled elsewhere. Map, table
//! and timeline views are projected from the same snapshot after every step.

pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod persist;
pub mod schema;
pub mod selection;
pub mod session;
pub mod store;
pub mod view;

#[cfg(feature = "python")]
mod python;
#[cfg(test)]
mod testing;

pub use config::{ColumnConfig, LabelingConfig};
pub use error::{LabelkitError, Result};
pub use model::{LabelCategory, LabelOptions, Trajectory, TrajectoryPoint};
pub use selection::SelectionRange;
pub use session::LabelingSession;
pub use store::CoverageStats;
pub use view::{Color, ViewModel};
