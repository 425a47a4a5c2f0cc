use crate::enums::{NavigationGesture, SlicingMode};

/// Settings applied when the viewer is created and on every load.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Mode used by [`crate::viewer::Viewer::load_default`].
    pub default_mode: SlicingMode,
    pub background: [f64; 3],
    pub parallel_projection: bool,
    /// Fit the camera a second time after orienting it.
    pub refit_after_orient: bool,
    /// Drag distance in pixels that sweeps a whole window or level domain.
    pub drag_span_px: f64,
    /// Step of the window and level channels.
    pub contrast_step: f64,
    /// Camera gestures attached once, on the first load.
    pub navigation: Vec<NavigationGesture>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_mode: SlicingMode::J,
            background: [0.2, 0.2, 0.2],
            parallel_projection: true,
            refit_after_orient: true,
            drag_span_px: 512.0,
            contrast_step: 1.0,
            navigation: vec![
                NavigationGesture::Pan,
                NavigationGesture::Zoom,
                NavigationGesture::Rotate,
            ],
        }
    }
}
