use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::axis::AxisAssignment;
use crate::volume::Volume;

/// Components smaller than this do not contribute a label letter.
const LABEL_THRESHOLD: f64 = 1e-4;

/// Geometry handed to orientation-marker widgets: the volume box in world
/// space and patient-orientation labels for the index axes and the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationMarker {
    pub direction: Matrix3<f64>,
    pub index_to_world: Matrix4<f64>,
    pub corners: [Vector3<f64>; 8],
    /// Label of the positive I, J and K directions, e.g. `"L"` or `"PS"`.
    pub axis_labels: [String; 3],
    /// Label of the screen's right direction for the current mode.
    pub screen_right: String,
    /// Label of the screen's up direction for the current mode.
    pub screen_up: String,
}

impl OrientationMarker {
    pub fn from_volume(volume: &Volume) -> Self {
        let direction = volume.direction;
        let axis_labels = [0, 1, 2].map(|i| patient_label(&direction.column(i).into_owned()));
        Self {
            direction,
            index_to_world: volume.index_to_world(),
            corners: volume.corners(),
            axis_labels,
            screen_right: String::new(),
            screen_up: String::new(),
        }
    }

    /// Updates the screen labels for a camera looking along
    /// `assignment.normal` with `assignment.view_up` pointing up.
    pub fn orient(&mut self, assignment: &AxisAssignment) {
        let right = assignment.normal.cross(&assignment.view_up);
        self.screen_right = patient_label(&right);
        self.screen_up = patient_label(&assignment.view_up);
    }
}

/// LPS letters for a world direction, strongest component first.
pub fn patient_label(v: &Vector3<f64>) -> String {
    let mut order = [0, 1, 2];
    order.sort_by(|&a, &b| v[b].abs().total_cmp(&v[a].abs()));
    order
        .iter()
        .filter(|&&axis| v[axis].abs() > LABEL_THRESHOLD)
        .map(|&axis| match (axis, v[axis] > 0.0) {
            (0, true) => 'L',
            (0, false) => 'R',
            (1, true) => 'P',
            (1, false) => 'A',
            (_, true) => 'S',
            (_, false) => 'I',
        })
        .collect()
}
