use nalgebra::Vector3;
use tracing::debug;

use crate::axis::AxisAssignment;
use crate::render::RenderEngine;

/// Camera pose as held by the render engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vector3<f64>,
    pub focal_point: Vector3<f64>,
    pub view_up: Vector3<f64>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 1.0),
            focal_point: Vector3::zeros(),
            view_up: Vector3::y(),
        }
    }
}

impl CameraState {
    pub fn direction_of_projection(&self) -> Vector3<f64> {
        (self.focal_point - self.position).normalize()
    }
}

pub struct CameraPlacer;

impl CameraPlacer {
    /// Orients the engine camera so it looks along `assignment.normal` with
    /// `assignment.view_up` pointing up, framing `bounds`.
    ///
    /// The engine fits the camera once to find the focal point, the camera is
    /// then moved one unit back along the normal, and with `refit` set the
    /// engine fits again so framing matches the new orientation.
    pub fn place<R: RenderEngine + ?Sized>(
        engine: &mut R,
        assignment: &AxisAssignment,
        bounds: &[f64; 6],
        refit: bool,
    ) -> CameraState {
        engine.reset_camera(bounds);
        let focal_point = engine.camera().focal_point;
        let camera = CameraState {
            position: focal_point - assignment.normal,
            focal_point,
            view_up: assignment.view_up,
        };
        engine.set_camera(&camera);
        if refit {
            engine.reset_camera(bounds);
        }
        let placed = engine.camera();
        debug!(
            position = ?placed.position,
            focal_point = ?placed.focal_point,
            "camera placed"
        );
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisResolver;
    use crate::direction::DirectionModel;
    use crate::enums::{GestureChannel, NavigationGesture, SlicingMode};
    use crate::interaction::ChannelDomain;
    use crate::volume::Volume;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    /// Fits by centring the focal point on the bounds and keeping the current
    /// view direction at a fixed distance.
    #[derive(Default)]
    struct FittingEngine {
        camera: CameraState,
        fits: usize,
    }

    impl RenderEngine for FittingEngine {
        fn set_background(&mut self, _rgb: [f64; 3]) {}
        fn set_parallel_projection(&mut self, _enabled: bool) {}
        fn set_input(&mut self, _volume: &Volume) {}
        fn set_slicing_mode(&mut self, _mode: SlicingMode) {}
        fn set_slice(&mut self, _slice: f64) {}
        fn set_color_window(&mut self, _window: f64) {}
        fn set_color_level(&mut self, _level: f64) {}
        fn camera(&self) -> CameraState {
            self.camera
        }
        fn set_camera(&mut self, camera: &CameraState) {
            self.camera = *camera;
        }
        fn reset_camera(&mut self, b: &[f64; 6]) {
            let center = Vector3::new(b[0] + b[1], b[2] + b[3], b[4] + b[5]) / 2.0;
            let dop = self.camera.direction_of_projection();
            self.camera.focal_point = center;
            self.camera.position = center - dop * 100.0;
            self.fits += 1;
        }
        fn attach_navigation(&mut self, _gestures: &[NavigationGesture]) {}
        fn bind_channel(&mut self, _channel: GestureChannel, _domain: ChannelDomain) {}
        fn render(&mut self) {}
    }

    #[test]
    fn camera_looks_along_normal() {
        let bounds = [0.0, 10.0, 0.0, 20.0, 0.0, 30.0];
        let direction = DirectionModel::new(*Rotation3::from_euler_angles(0.0, 0.0, 0.4).matrix());
        let assignment = AxisResolver::resolve(SlicingMode::K, &direction);
        let mut engine = FittingEngine::default();

        let camera = CameraPlacer::place(&mut engine, &assignment, &bounds, true);

        assert_eq!(engine.fits, 2);
        assert_relative_eq!(camera.focal_point, Vector3::new(5.0, 10.0, 15.0));
        assert_relative_eq!(
            camera.direction_of_projection(),
            assignment.normal,
            epsilon = 1e-12
        );
        assert_relative_eq!(camera.view_up, assignment.view_up);
    }

    #[test]
    fn single_fit_leaves_camera_one_unit_from_focal_point() {
        let bounds = [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
        let assignment = AxisResolver::resolve(SlicingMode::Y, &DirectionModel::default());
        let mut engine = FittingEngine::default();

        let camera = CameraPlacer::place(&mut engine, &assignment, &bounds, false);

        assert_eq!(engine.fits, 1);
        assert_relative_eq!((camera.focal_point - camera.position).norm(), 1.0);
        assert_relative_eq!(camera.position, -assignment.normal);
    }
}
