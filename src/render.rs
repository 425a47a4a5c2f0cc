use crate::camera::CameraState;
use crate::enums::{GestureChannel, NavigationGesture, SlicingMode};
use crate::interaction::ChannelDomain;
use crate::orientation::OrientationMarker;
use crate::volume::Volume;

/// Rendering engine driven by the viewer.
///
/// The viewer computes geometry and interaction state and pushes it through
/// this trait; drawing, camera ownership and pointer capture stay with the
/// engine.
pub trait RenderEngine {
    fn set_background(&mut self, rgb: [f64; 3]);
    fn set_parallel_projection(&mut self, enabled: bool);

    /// Hands the volume to the slice mapper.
    fn set_input(&mut self, volume: &Volume);
    fn set_slicing_mode(&mut self, mode: SlicingMode);
    fn set_slice(&mut self, slice: f64);

    fn set_color_window(&mut self, window: f64);
    fn set_color_level(&mut self, level: f64);

    fn camera(&self) -> CameraState;
    fn set_camera(&mut self, camera: &CameraState);
    /// Fits the camera to `bounds`, keeping its current view direction.
    fn reset_camera(&mut self, bounds: &[f64; 6]);

    fn attach_navigation(&mut self, gestures: &[NavigationGesture]);
    /// Tells the engine's manipulator the domain of a gesture channel.
    fn bind_channel(&mut self, channel: GestureChannel, domain: ChannelDomain);

    fn render(&mut self);
}

/// Widget that tracks the current orientation, such as an axis marker.
pub trait OrientationObserver {
    fn orientation_changed(&mut self, marker: &OrientationMarker);
}
