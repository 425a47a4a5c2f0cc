use thiserror::Error;
use tracing::{debug, info, trace};

use crate::axis::{AxisAssignment, AxisResolver};
use crate::camera::{CameraPlacer, CameraState};
use crate::config::ViewerConfig;
use crate::contrast::{ContrastModel, ContrastState};
use crate::direction::DirectionModel;
use crate::enums::{GestureChannel, ParseSlicingModeError, SlicingMode};
use crate::interaction::{ChannelUpdate, InteractionBindings, PointerGesture};
use crate::orientation::OrientationMarker;
use crate::render::{OrientationObserver, RenderEngine};
use crate::slice_domain::{SliceDomain, SliceRange};
use crate::volume::Volume;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("no volume loaded")]
    NotLoaded,

    #[error(transparent)]
    InvalidSlicingMode(#[from] ParseSlicingModeError),
}

/// Axis and slice range derived for one slicing mode. Always rebuilt whole.
#[derive(Debug, Clone, Copy)]
struct ModeState {
    mode: SlicingMode,
    assignment: AxisAssignment,
    slices: SliceRange,
}

impl ModeState {
    fn derive(mode: SlicingMode, volume: &Volume, direction: &DirectionModel) -> Self {
        let assignment = AxisResolver::resolve(mode, direction);
        let slices = SliceDomain::compute(mode, volume, &assignment);
        Self {
            mode,
            assignment,
            slices,
        }
    }
}

/// Everything derived from the loaded volume, replaced wholesale on load.
struct Loaded {
    volume: Volume,
    direction: DirectionModel,
    bounds: [f64; 6],
    marker: OrientationMarker,
    contrast: ContrastModel,
    bindings: InteractionBindings,
    mode: ModeState,
    slice: f64,
    camera: CameraState,
}

impl Loaded {
    /// Stores a channel update and forwards it to the engine. Returns false
    /// without touching the engine when the value is unchanged.
    fn write<R: RenderEngine + ?Sized>(&mut self, engine: &mut R, update: ChannelUpdate) -> bool {
        match update {
            ChannelUpdate::Window(window) => {
                let changed = self.contrast.set_window(window);
                if changed {
                    engine.set_color_window(self.contrast.window());
                }
                changed
            }
            ChannelUpdate::Level(level) => {
                let changed = self.contrast.set_level(level);
                if changed {
                    engine.set_color_level(level);
                }
                changed
            }
            ChannelUpdate::Slice(slice) => {
                if slice == self.slice {
                    return false;
                }
                self.slice = slice;
                engine.set_slice(slice);
                true
            }
        }
    }
}

/// Keeps camera, slice range and window/level of a single-slice view in step
/// with the loaded volume, the slicing mode and pointer input.
///
/// The engine is borrowed for the viewer's lifetime; the viewer never owns
/// the camera or the render window.
pub struct Viewer<'a, R: RenderEngine + ?Sized> {
    engine: &'a mut R,
    observers: Vec<Box<dyn OrientationObserver + 'a>>,
    config: ViewerConfig,
    navigation_attached: bool,
    loaded: Option<Loaded>,
}

impl<'a, R: RenderEngine + ?Sized> Viewer<'a, R> {
    pub fn new(engine: &'a mut R, config: ViewerConfig) -> Self {
        engine.set_background(config.background);
        engine.set_parallel_projection(config.parallel_projection);
        engine.render();
        Self {
            engine,
            observers: Vec::new(),
            config,
            navigation_attached: false,
            loaded: None,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn OrientationObserver + 'a>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn engine(&self) -> &R {
        &*self.engine
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Loads with the configured default mode.
    pub fn load_default(&mut self, volume: Volume) {
        let mode = self.config.default_mode;
        self.load(volume, mode);
    }

    /// Replaces the current volume and everything derived from it, then
    /// activates `mode`.
    pub fn load(&mut self, volume: Volume, mode: SlicingMode) {
        let (min, max) = volume.scalar_range();
        info!(
            dimensions = ?volume.dimensions(),
            spacing = ?volume.spacing,
            min,
            max,
            %mode,
            "loading volume"
        );

        if !self.navigation_attached {
            self.engine.attach_navigation(&self.config.navigation);
            self.navigation_attached = true;
        }
        self.engine.set_input(&volume);

        let direction = DirectionModel::new(volume.direction);
        let contrast = ContrastModel::from_range(min, max);
        self.engine.set_color_window(contrast.window());
        self.engine.set_color_level(contrast.level());

        let marker = OrientationMarker::from_volume(&volume);
        let state = ModeState::derive(mode, &volume, &direction);
        let bindings = InteractionBindings::new(
            &contrast,
            &state.slices,
            self.config.contrast_step,
            self.config.drag_span_px,
        );
        for channel in [GestureChannel::HorizontalDrag, GestureChannel::VerticalDrag] {
            self.engine.bind_channel(channel, bindings.domain(channel));
        }

        self.loaded = Some(Loaded {
            bounds: volume.bounds(),
            volume,
            direction,
            marker,
            contrast,
            bindings,
            mode: state,
            slice: state.slices.initial_slice(),
            camera: CameraState::default(),
        });
        self.activate(state);
    }

    /// Re-derives axis, camera and slice range for `mode`. Window and level
    /// are left as they are.
    pub fn set_slicing_mode(&mut self, mode: SlicingMode) -> Result<(), ViewerError> {
        let loaded = self.loaded.as_ref().ok_or(ViewerError::NotLoaded)?;
        let state = ModeState::derive(mode, &loaded.volume, &loaded.direction);
        self.activate(state);
        Ok(())
    }

    /// Like [`Viewer::set_slicing_mode`] with a mode name such as `"k"` or
    /// `"axial"`.
    pub fn set_slicing_mode_by_name(&mut self, name: &str) -> Result<(), ViewerError> {
        let mode = name.parse::<SlicingMode>()?;
        self.set_slicing_mode(mode)
    }

    fn activate(&mut self, state: ModeState) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        debug!(
            mode = %state.mode,
            index_axis = ?state.assignment.index_axis,
            min = state.slices.min,
            max = state.slices.max,
            step = state.slices.step,
            "activating slicing mode"
        );

        loaded.camera = CameraPlacer::place(
            &mut *self.engine,
            &state.assignment,
            &loaded.bounds,
            self.config.refit_after_orient,
        );

        self.engine.set_slicing_mode(state.mode);
        loaded.slice = state.slices.initial_slice();
        self.engine.set_slice(loaded.slice);
        loaded.mode = state;

        loaded.bindings.rebind_slice(&state.slices);
        self.engine
            .bind_channel(GestureChannel::Scroll, loaded.bindings.domain(GestureChannel::Scroll));

        loaded.marker.orient(&state.assignment);
        for observer in &mut self.observers {
            observer.orientation_changed(&loaded.marker);
        }
        self.engine.render();
    }

    pub fn slicing_mode(&self) -> Option<SlicingMode> {
        self.loaded.as_ref().map(|l| l.mode.mode)
    }

    pub fn axis_assignment(&self) -> Option<AxisAssignment> {
        self.loaded.as_ref().map(|l| l.mode.assignment)
    }

    pub fn slice_range(&self) -> Option<SliceRange> {
        self.loaded.as_ref().map(|l| l.mode.slices)
    }

    pub fn contrast(&self) -> Option<ContrastState> {
        self.loaded.as_ref().map(|l| l.contrast.state())
    }

    pub fn camera(&self) -> Option<CameraState> {
        self.loaded.as_ref().map(|l| l.camera)
    }

    pub fn marker(&self) -> Option<&OrientationMarker> {
        self.loaded.as_ref().map(|l| &l.marker)
    }

    pub fn volume(&self) -> Option<&Volume> {
        self.loaded.as_ref().map(|l| &l.volume)
    }

    pub fn window_width(&self) -> Option<f64> {
        self.loaded.as_ref().map(|l| l.contrast.window())
    }

    pub fn window_level(&self) -> Option<f64> {
        self.loaded.as_ref().map(|l| l.contrast.level())
    }

    pub fn slice(&self) -> Option<f64> {
        self.loaded.as_ref().map(|l| l.slice)
    }

    /// Sets the window and renders. Returns whether the value changed.
    pub fn set_window_width(&mut self, window: f64) -> Result<bool, ViewerError> {
        self.set(ChannelUpdate::Window(window))
    }

    pub fn set_window_level(&mut self, level: f64) -> Result<bool, ViewerError> {
        self.set(ChannelUpdate::Level(level))
    }

    /// Sets the slice position and renders. Values outside the slice range
    /// are passed through; keeping them in range is up to the caller.
    pub fn set_slice(&mut self, slice: f64) -> Result<bool, ViewerError> {
        self.set(ChannelUpdate::Slice(slice))
    }

    fn set(&mut self, update: ChannelUpdate) -> Result<bool, ViewerError> {
        let loaded = self.loaded.as_mut().ok_or(ViewerError::NotLoaded)?;
        let changed = loaded.write(&mut *self.engine, update);
        if changed {
            self.engine.render();
        }
        Ok(changed)
    }

    /// Value the manipulator of `channel` reports for the current state.
    pub fn channel_value(&self, channel: GestureChannel) -> Result<f64, ViewerError> {
        let loaded = self.loaded.as_ref().ok_or(ViewerError::NotLoaded)?;
        Ok(loaded
            .bindings
            .value(channel, &loaded.contrast, loaded.slice))
    }

    /// Applies a value reported by the manipulator of `channel`, as a gesture
    /// tick would.
    pub fn apply_channel(
        &mut self,
        channel: GestureChannel,
        value: f64,
    ) -> Result<bool, ViewerError> {
        let update = {
            let loaded = self.loaded.as_ref().ok_or(ViewerError::NotLoaded)?;
            loaded.bindings.update(channel, value)
        };
        self.set(update)
    }

    /// Routes pointer input to the window, level and slice channels and
    /// renders once if anything changed. Returns whether anything changed.
    pub fn handle_pointer(&mut self, gesture: PointerGesture) -> Result<bool, ViewerError> {
        let loaded = self.loaded.as_mut().ok_or(ViewerError::NotLoaded)?;
        let mut changed = false;
        for (channel, delta) in loaded.bindings.route(&gesture) {
            let current = loaded.bindings.value(channel, &loaded.contrast, loaded.slice);
            let next = loaded.bindings.advance(channel, current, delta);
            if next == current {
                continue;
            }
            let update = loaded.bindings.update(channel, next);
            trace!(?channel, current, next, ?update, "gesture tick");
            changed |= loaded.write(&mut *self.engine, update);
        }
        if changed {
            self.engine.render();
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::NavigationGesture;
    use crate::interaction::ChannelDomain;
    use ndarray::Array3;

    #[derive(Default)]
    struct CountingEngine {
        camera: CameraState,
        renders: usize,
        navigation: usize,
        slices: Vec<f64>,
    }

    impl RenderEngine for CountingEngine {
        fn set_background(&mut self, _rgb: [f64; 3]) {}
        fn set_parallel_projection(&mut self, _enabled: bool) {}
        fn set_input(&mut self, _volume: &Volume) {}
        fn set_slicing_mode(&mut self, _mode: SlicingMode) {}
        fn set_slice(&mut self, slice: f64) {
            self.slices.push(slice);
        }
        fn set_color_window(&mut self, _window: f64) {}
        fn set_color_level(&mut self, _level: f64) {}
        fn camera(&self) -> CameraState {
            self.camera
        }
        fn set_camera(&mut self, camera: &CameraState) {
            self.camera = *camera;
        }
        fn reset_camera(&mut self, _bounds: &[f64; 6]) {}
        fn attach_navigation(&mut self, _gestures: &[NavigationGesture]) {
            self.navigation += 1;
        }
        fn bind_channel(&mut self, _channel: GestureChannel, _domain: ChannelDomain) {}
        fn render(&mut self) {
            self.renders += 1;
        }
    }

    fn small_volume() -> Volume {
        Volume::new(
            Array3::from_shape_fn((5, 4, 3), |(k, _, _)| k as f32 * 10.0),
            [1.0, 1.0, 2.0],
        )
    }

    #[test]
    fn operations_before_load_fail() {
        let mut engine = CountingEngine::default();
        let mut viewer = Viewer::new(&mut engine, ViewerConfig::default());
        assert_eq!(viewer.set_slicing_mode(SlicingMode::K), Err(ViewerError::NotLoaded));
        assert_eq!(viewer.set_window_width(3.0), Err(ViewerError::NotLoaded));
        assert_eq!(viewer.window_width(), None);
    }

    #[test]
    fn unknown_mode_name_fails_fast() {
        let mut engine = CountingEngine::default();
        let mut viewer = Viewer::new(&mut engine, ViewerConfig::default());
        viewer.load_default(small_volume());
        assert!(matches!(
            viewer.set_slicing_mode_by_name("q"),
            Err(ViewerError::InvalidSlicingMode(_))
        ));
        assert_eq!(viewer.slicing_mode(), Some(SlicingMode::J));
    }

    #[test]
    fn load_default_uses_configured_mode() {
        let mut engine = CountingEngine::default();
        let config = ViewerConfig {
            default_mode: SlicingMode::Z,
            ..ViewerConfig::default()
        };
        let mut viewer = Viewer::new(&mut engine, config);
        viewer.load_default(small_volume());
        assert_eq!(viewer.slicing_mode(), Some(SlicingMode::Z));
    }

    #[test]
    fn navigation_is_attached_once() {
        let mut engine = CountingEngine::default();
        let mut viewer = Viewer::new(&mut engine, ViewerConfig::default());
        viewer.load(small_volume(), SlicingMode::K);
        viewer.load(small_volume(), SlicingMode::I);
        assert_eq!(viewer.engine().navigation, 1);
    }

    #[test]
    fn mode_change_keeps_contrast_and_resets_slice() {
        let mut engine = CountingEngine::default();
        let mut viewer = Viewer::new(&mut engine, ViewerConfig::default());
        viewer.load(small_volume(), SlicingMode::K);
        assert_eq!(viewer.slice(), Some(2.0));
        viewer.set_window_width(12.0).unwrap();
        viewer.set_slice(4.0).unwrap();

        viewer.set_slicing_mode(SlicingMode::I).unwrap();

        assert_eq!(viewer.window_width(), Some(12.0));
        assert_eq!(viewer.slice(), Some(1.0));
        assert_eq!(viewer.engine().slices.last(), Some(&1.0));
    }

    #[test]
    fn pointer_drag_and_scroll_update_state() {
        let mut engine = CountingEngine::default();
        let config = ViewerConfig {
            drag_span_px: 40.0,
            ..ViewerConfig::default()
        };
        let mut viewer = Viewer::new(&mut engine, config);
        viewer.load(small_volume(), SlicingMode::K);
        assert_eq!(
            viewer.contrast(),
            Some(ContrastState {
                window: 40.0,
                level: 20.0,
            })
        );

        // The window domain spans 40 over 40 px, so 10 px left narrows it by 10.
        let changed = viewer
            .handle_pointer(PointerGesture::Drag {
                dx: -10.0,
                dy: 0.0,
                primary: true,
                modifier: true,
            })
            .unwrap();
        assert!(changed);
        assert_eq!(viewer.window_width(), Some(30.0));

        viewer
            .handle_pointer(PointerGesture::Scroll { ticks: 1.0 })
            .unwrap();
        assert_eq!(viewer.slice(), Some(3.0));

        let renders = viewer.engine().renders;
        let navigation = PointerGesture::Drag {
            dx: 10.0,
            dy: 10.0,
            primary: true,
            modifier: false,
        };
        assert!(!viewer.handle_pointer(navigation).unwrap());
        assert_eq!(viewer.engine().renders, renders);
    }
}
