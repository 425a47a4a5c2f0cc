use tracing::warn;

use crate::axis::AxisAssignment;
use crate::enums::SlicingMode;
use crate::volume::Volume;

/// Valid slice positions for the active mode.
///
/// Index units for I/J/K, world units for X/Y/Z. `min <= max` and `step > 0`
/// always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliceRange {
    /// Midpoint of the range snapped to a multiple of `step`.
    pub fn initial_slice(&self) -> f64 {
        let mid = (self.min + self.max) / 2.0;
        round_half_up(mid / self.step) * self.step
    }
}

/// Rounds to the nearest integer, halves going towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub struct SliceDomain;

impl SliceDomain {
    pub fn compute(mode: SlicingMode, volume: &Volume, assignment: &AxisAssignment) -> SliceRange {
        let axis = mode.axis_position();
        let (a, b, step) = if mode.is_anatomical() {
            // Bounds keep the nominal X/Y/Z order; the step follows the storage
            // axis the slice actually advances along.
            let bounds = volume.bounds();
            let spacing = volume.spacing[assignment.index_axis.position()];
            (bounds[2 * axis], bounds[2 * axis + 1], spacing)
        } else {
            let extent = volume.extent();
            (extent[2 * axis] as f64, extent[2 * axis + 1] as f64, 1.0)
        };

        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            warn!(%mode, step, "non-positive slice step, using 1");
            1.0
        };
        SliceRange {
            min: a.min(b),
            max: a.max(b),
            step,
        }
    }
}
