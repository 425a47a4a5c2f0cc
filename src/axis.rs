use std::f64::consts::FRAC_1_SQRT_2;

use nalgebra::Vector3;
use tracing::warn;

use crate::direction::DirectionModel;
use crate::enums::{IndexAxis, SlicingMode};

/// Slice normal, camera view-up and storage axis resolved for one slicing mode.
///
/// Rebuilt from scratch on every load and mode change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAssignment {
    /// World-space slice normal. The camera looks along it.
    pub normal: Vector3<f64>,
    /// World-space camera view-up.
    pub view_up: Vector3<f64>,
    /// Index-space normal after nearest-axis rounding.
    pub index_normal: Vector3<f64>,
    /// Storage axis the slice advances along.
    pub index_axis: IndexAxis,
}

pub struct AxisResolver;

impl AxisResolver {
    pub fn resolve(mode: SlicingMode, direction: &DirectionModel) -> AxisAssignment {
        let (normal, view_up) = Self::canonical(mode);
        if !mode.is_anatomical() {
            return AxisAssignment {
                normal: direction.to_world(&normal),
                view_up: direction.to_world(&view_up),
                index_normal: normal,
                index_axis: IndexAxis::ALL[mode.axis_position()],
            };
        }

        // Oblique volumes are not resampled: snap to the closest storage axis.
        let index_normal = Self::nearest_axis(&direction.to_index(&normal));
        let index_up = Self::perpendicular_axis(&direction.to_index(&view_up), &index_normal);
        AxisAssignment {
            normal: direction.to_world(&index_normal),
            view_up: direction.to_world(&index_up),
            index_normal,
            index_axis: Self::dominant_axis(&index_normal),
        }
    }

    /// Canonical (normal, view-up) pair. Index modes are expressed in index
    /// space, anatomical modes in LPS world space.
    fn canonical(mode: SlicingMode) -> (Vector3<f64>, Vector3<f64>) {
        let (normal, up) = match mode {
            SlicingMode::I => ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            SlicingMode::J => ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
            SlicingMode::K => ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            SlicingMode::X => ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            SlicingMode::Y => ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            SlicingMode::Z => ([0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
        };
        (Vector3::from(normal), Vector3::from(up))
    }

    /// Rounds a component to -1, 0 or 1. Magnitudes up to and including
    /// cos 45° round to 0.
    pub fn round_component(value: f64) -> f64 {
        if value > FRAC_1_SQRT_2 {
            1.0
        } else if value < -FRAC_1_SQRT_2 {
            -1.0
        } else {
            0.0
        }
    }

    /// Rounds every component of `v`. A vector that would round to zero keeps
    /// only its largest component instead, the lowest axis winning ties.
    pub fn nearest_axis(v: &Vector3<f64>) -> Vector3<f64> {
        let rounded = v.map(Self::round_component);
        if rounded != Vector3::zeros() {
            return rounded;
        }
        warn!(?v, "no component beyond cos 45 degrees, using largest component");
        let position = Self::largest_component(v);
        let sign = if v[position] < 0.0 { -1.0 } else { 1.0 };
        Vector3::ith(position, sign)
    }

    /// Like [`AxisResolver::nearest_axis`], but never returns the axis of
    /// `normal`. Only the largest-component fallback can collide with it; the
    /// next largest component is used then.
    fn perpendicular_axis(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
        let rounded = Self::nearest_axis(v);
        if rounded.dot(normal) == 0.0 {
            return rounded;
        }
        let taken = Self::largest_component(normal);
        let mut rest = *v;
        rest[taken] = 0.0;
        warn!(?v, "view-up rounds onto the slice normal, using next largest component");
        let position = Self::largest_component(&rest);
        let sign = if rest[position] < 0.0 { -1.0 } else { 1.0 };
        Vector3::ith(position, sign)
    }

    fn dominant_axis(v: &Vector3<f64>) -> IndexAxis {
        IndexAxis::ALL[Self::largest_component(v)]
    }

    fn largest_component(v: &Vector3<f64>) -> usize {
        (1..3).fold(0, |best, i| if v[i].abs() > v[best].abs() { i } else { best })
    }
}
