use std::path::PathBuf;

use clap::Parser;
use slice_viewer::{
    CameraState, ChannelDomain, GestureChannel, NavigationGesture, OrientationMarker,
    OrientationObserver, PointerGesture, RenderEngine, SlicingMode, SortBy, Viewer, ViewerConfig,
    Volume, VolumeLoader, VolumeLoaderError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Args {
    /// Directory holding the .dcm files of one series
    #[arg(short, long, default_value = "dicom")]
    dir: PathBuf,

    /// Slicing mode: i, j, k, x (sagittal), y (coronal) or z (axial)
    #[arg(short, long, default_value = "j")]
    mode: SlicingMode,

    /// Slice ordering: position, table, instance or none
    #[arg(short, long, default_value = "position")]
    sort_by: SortBy,
}

/// Stands in for a real renderer: keeps the camera and logs what it is told.
struct LoggingEngine {
    camera: CameraState,
}

impl RenderEngine for LoggingEngine {
    fn set_background(&mut self, rgb: [f64; 3]) {
        info!(?rgb, "background");
    }

    fn set_parallel_projection(&mut self, enabled: bool) {
        info!(enabled, "parallel projection");
    }

    fn set_input(&mut self, volume: &Volume) {
        info!(dimensions = ?volume.dimensions(), "input");
    }

    fn set_slicing_mode(&mut self, mode: SlicingMode) {
        info!(%mode, "slicing mode");
    }

    fn set_slice(&mut self, slice: f64) {
        info!(slice, "slice");
    }

    fn set_color_window(&mut self, window: f64) {
        info!(window, "color window");
    }

    fn set_color_level(&mut self, level: f64) {
        info!(level, "color level");
    }

    fn camera(&self) -> CameraState {
        self.camera
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = *camera;
    }

    fn reset_camera(&mut self, b: &[f64; 6]) {
        let center = nalgebra::Vector3::new(b[0] + b[1], b[2] + b[3], b[4] + b[5]) / 2.0;
        let direction = self.camera.direction_of_projection();
        self.camera.focal_point = center;
        self.camera.position = center - direction;
    }

    fn attach_navigation(&mut self, gestures: &[NavigationGesture]) {
        info!(?gestures, "navigation attached");
    }

    fn bind_channel(&mut self, channel: GestureChannel, domain: ChannelDomain) {
        info!(?channel, min = domain.min, max = domain.max, step = domain.step, "channel bound");
    }

    fn render(&mut self) {}
}

struct LabelPrinter;

impl OrientationObserver for LabelPrinter {
    fn orientation_changed(&mut self, marker: &OrientationMarker) {
        info!(
            axes = ?marker.axis_labels,
            right = %marker.screen_right,
            up = %marker.screen_up,
            "orientation"
        );
    }
}

fn main() -> Result<(), VolumeLoaderError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let volume = VolumeLoader::load_from_directory(&args.dir, args.sort_by)?;

    let mut engine = LoggingEngine {
        camera: CameraState::default(),
    };
    let mut viewer = Viewer::new(&mut engine, ViewerConfig::default());
    viewer.add_observer(Box::new(LabelPrinter));
    viewer.load(volume, args.mode);

    // One scroll notch and a short window/level drag, as a user would.
    viewer
        .handle_pointer(PointerGesture::Scroll { ticks: 1.0 })
        .expect("volume is loaded");
    viewer
        .handle_pointer(PointerGesture::Drag {
            dx: 16.0,
            dy: -8.0,
            primary: true,
            modifier: true,
        })
        .expect("volume is loaded");

    if let (Some(contrast), Some(slice), Some(range)) =
        (viewer.contrast(), viewer.slice(), viewer.slice_range())
    {
        info!(
            window = contrast.window,
            level = contrast.level,
            slice,
            min = range.min,
            max = range.max,
            "final state"
        );
    }
    Ok(())
}
