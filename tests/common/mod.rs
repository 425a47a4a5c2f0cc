#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use nalgebra::{Matrix3, Vector3};
use ndarray::Array3;
use slice_viewer::{
    CameraState, ChannelDomain, GestureChannel, NavigationGesture, OrientationMarker,
    OrientationObserver, RenderEngine, SlicingMode, Volume,
};

/// Render engine double that records every call the viewer makes.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub camera: CameraState,
    pub renders: usize,
    pub fits: usize,
    pub inputs: usize,
    pub navigation: Vec<Vec<NavigationGesture>>,
    pub modes: Vec<SlicingMode>,
    pub slices: Vec<f64>,
    pub windows: Vec<f64>,
    pub levels: Vec<f64>,
    pub channels: HashMap<GestureChannel, ChannelDomain>,
    pub background: Option<[f64; 3]>,
    pub parallel: Option<bool>,
}

impl RenderEngine for RecordingEngine {
    fn set_background(&mut self, rgb: [f64; 3]) {
        self.background = Some(rgb);
    }

    fn set_parallel_projection(&mut self, enabled: bool) {
        self.parallel = Some(enabled);
    }

    fn set_input(&mut self, _volume: &Volume) {
        self.inputs += 1;
    }

    fn set_slicing_mode(&mut self, mode: SlicingMode) {
        self.modes.push(mode);
    }

    fn set_slice(&mut self, slice: f64) {
        self.slices.push(slice);
    }

    fn set_color_window(&mut self, window: f64) {
        self.windows.push(window);
    }

    fn set_color_level(&mut self, level: f64) {
        self.levels.push(level);
    }

    fn camera(&self) -> CameraState {
        self.camera
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = *camera;
    }

    /// Centres the focal point on the bounds and backs off along the current
    /// view direction.
    fn reset_camera(&mut self, b: &[f64; 6]) {
        let center = Vector3::new(b[0] + b[1], b[2] + b[3], b[4] + b[5]) / 2.0;
        let distance = Vector3::new(b[1] - b[0], b[3] - b[2], b[5] - b[4]).norm() + 1.0;
        let direction = self.camera.direction_of_projection();
        self.camera.focal_point = center;
        self.camera.position = center - direction * distance;
        self.fits += 1;
    }

    fn attach_navigation(&mut self, gestures: &[NavigationGesture]) {
        self.navigation.push(gestures.to_vec());
    }

    fn bind_channel(&mut self, channel: GestureChannel, domain: ChannelDomain) {
        self.channels.insert(channel, domain);
    }

    fn render(&mut self) {
        self.renders += 1;
    }
}

/// Observer that keeps every marker it is handed.
#[derive(Clone, Default)]
pub struct MarkerLog(pub Rc<RefCell<Vec<OrientationMarker>>>);

impl OrientationObserver for MarkerLog {
    fn orientation_changed(&mut self, marker: &OrientationMarker) {
        self.0.borrow_mut().push(marker.clone());
    }
}

/// 256 x 256 x 50 volume with intensities from -1000 to 3000.
pub fn ct_volume(spacing: [f64; 3]) -> Volume {
    let mut data = Array3::<f32>::zeros((50, 256, 256));
    data[[0, 0, 0]] = -1000.0;
    data[[49, 255, 255]] = 3000.0;
    Volume::new(data, spacing)
}

/// Rotation about the K (world Z) axis.
pub fn rotation_about_k(degrees: f64) -> Matrix3<f64> {
    let (s, c) = degrees.to_radians().sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}
