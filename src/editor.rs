use tracing::info;

use crate::error::Result;
use crate::model::{LabelCategory, Trajectory};
use crate::selection::SelectionRange;

/// Label every point in `range` (inclusive) with `category`.
///
/// Returns a new trajectory; rows outside the range keep their labels, rows
/// inside lose whatever label they had.
pub fn apply(
    trajectory: &Trajectory,
    range: SelectionRange,
    category: &LabelCategory,
) -> Result<Trajectory> {
    range.ensure_within(trajectory)?;

    let mut updated = trajectory.clone();
    for point in &mut updated.points_mut()[range.indices()] {
        point.label = Some(category.as_str().to_string());
    }

    info!(
        vessel = trajectory.vessel_key(),
        start = range.start(),
        end = range.end(),
        label = %category,
        "labeled segment"
    );
    Ok(updated)
}
