//! # Slice-viewer library
//!
//! This crate holds the geometry and interaction state behind a viewer that
//! shows one reformatted slice of a 3D medical volume. Drawing is left to a
//! rendering engine behind the [`RenderEngine`] trait and file decoding to the
//! DICOM [`VolumeLoader`]; what remains here is keeping three things
//! consistent with each other and with pointer input:
//!  - the camera, oriented along the slice normal of the active mode
//!  - the slice range and position
//!  - the window/level contrast mapping
//!
//! The volume can be sliced along its storage axes (I, J, K) or along the
//! anatomical planes:
//!  - Sagittal (X)
//!  - Coronal (Y)
//!  - Axial (Z)
//!
//!  Oblique volumes are not resampled. An anatomical mode snaps to the
//!  storage axis closest to the anatomical normal, and the slice still
//!  advances one voxel layer at a time.
//!
//!  Setters report whether the value changed and only redraw on change, so
//!  pointer ticks that land on the current value cost nothing.
//!
//! # Examples
//!
//! ## Viewing the axial plane of a DICOM series
//!
//! ```no_run
//! # use slice_viewer::{RenderEngine, SlicingMode, SortBy, Viewer, ViewerConfig, VolumeLoader};
//! # fn run(engine: &mut impl RenderEngine) {
//! let volume = VolumeLoader::load_from_directory("dicom", SortBy::ImagePositionPatient)
//!     .expect("should have loaded files from directory");
//! let mut viewer = Viewer::new(engine, ViewerConfig::default());
//! viewer.load(volume, SlicingMode::Z);
//! viewer
//!     .set_window_width(400.0)
//!     .expect("volume is loaded");
//! # }
//! ```

pub mod axis;
pub mod camera;
pub mod config;
pub mod contrast;
pub mod direction;
pub mod enums;
pub mod interaction;
pub mod orientation;
pub mod render;
pub mod slice_domain;
pub mod viewer;
pub mod volume;
pub mod volume_loader;

pub use axis::{AxisAssignment, AxisResolver};
pub use camera::{CameraPlacer, CameraState};
pub use config::ViewerConfig;
pub use contrast::{ContrastModel, ContrastState};
pub use direction::DirectionModel;
pub use enums::{
    GestureChannel, IndexAxis, NavigationGesture, ParseSlicingModeError, SlicingMode, SortBy,
};
pub use interaction::{ChannelDomain, ChannelUpdate, InteractionBindings, PointerGesture};
pub use orientation::OrientationMarker;
pub use render::{OrientationObserver, RenderEngine};
pub use slice_domain::{SliceDomain, SliceRange};
pub use viewer::{Viewer, ViewerError};
pub use volume::Volume;
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
