use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Plane the viewer slices along.
///
/// `I`, `J` and `K` address the storage axes of the volume directly. `X`, `Y`
/// and `Z` address the sagittal, coronal and axial anatomical planes and are
/// resolved through the direction matrix to the closest storage axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlicingMode {
    I,
    #[default]
    J,
    K,
    X,
    Y,
    Z,
}

impl SlicingMode {
    pub const ALL: [SlicingMode; 6] = [
        SlicingMode::I,
        SlicingMode::J,
        SlicingMode::K,
        SlicingMode::X,
        SlicingMode::Y,
        SlicingMode::Z,
    ];

    /// True for the sagittal, coronal and axial modes.
    pub fn is_anatomical(self) -> bool {
        matches!(self, SlicingMode::X | SlicingMode::Y | SlicingMode::Z)
    }

    /// Position of the mode's nominal axis: I and X map to 0, J and Y to 1,
    /// K and Z to 2.
    pub fn axis_position(self) -> usize {
        match self {
            SlicingMode::I | SlicingMode::X => 0,
            SlicingMode::J | SlicingMode::Y => 1,
            SlicingMode::K | SlicingMode::Z => 2,
        }
    }
}

impl fmt::Display for SlicingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlicingMode::I => "I",
            SlicingMode::J => "J",
            SlicingMode::K => "K",
            SlicingMode::X => "X",
            SlicingMode::Y => "Y",
            SlicingMode::Z => "Z",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSlicingModeError {
    #[error("unknown slicing mode {0:?}, expected one of i, j, k, x, y, z")]
    UnknownName(String),

    #[error("slicing mode index {0} out of range 0..=5")]
    IndexOutOfRange(usize),
}

impl FromStr for SlicingMode {
    type Err = ParseSlicingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" => Ok(SlicingMode::I),
            "j" => Ok(SlicingMode::J),
            "k" => Ok(SlicingMode::K),
            "x" | "sagittal" => Ok(SlicingMode::X),
            "y" | "coronal" => Ok(SlicingMode::Y),
            "z" | "axial" => Ok(SlicingMode::Z),
            _ => Err(ParseSlicingModeError::UnknownName(s.to_string())),
        }
    }
}

impl TryFrom<usize> for SlicingMode {
    type Error = ParseSlicingModeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        SlicingMode::ALL
            .get(value)
            .copied()
            .ok_or(ParseSlicingModeError::IndexOutOfRange(value))
    }
}

/// Storage axis of a volume, in (I, J, K) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexAxis {
    I,
    J,
    K,
}

impl IndexAxis {
    pub const ALL: [IndexAxis; 3] = [IndexAxis::I, IndexAxis::J, IndexAxis::K];

    pub fn position(self) -> usize {
        match self {
            IndexAxis::I => 0,
            IndexAxis::J => 1,
            IndexAxis::K => 2,
        }
    }
}

/// Pointer gesture channels bound to window, level and slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureChannel {
    /// Primary button + modifier, horizontal motion. Drives the window.
    HorizontalDrag,
    /// Primary button + modifier, vertical motion. Drives the level.
    VerticalDrag,
    /// Scroll wheel. Drives the slice.
    Scroll,
}

/// Camera navigation the engine handles on its own, attached once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationGesture {
    Pan,
    Zoom,
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "position" | "image-position-patient" => Ok(SortBy::ImagePositionPatient),
            "table" | "table-position" => Ok(SortBy::TablePosition),
            "instance" | "instance-number" => Ok(SortBy::InstanceNumber),
            "none" => Ok(SortBy::None),
            other => Err(format!("unknown sort order {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_names_case_insensitively() {
        assert_eq!("k".parse::<SlicingMode>(), Ok(SlicingMode::K));
        assert_eq!(" Z ".parse::<SlicingMode>(), Ok(SlicingMode::Z));
        assert_eq!("coronal".parse::<SlicingMode>(), Ok(SlicingMode::Y));
    }

    #[test]
    fn rejects_unknown_modes() {
        assert_eq!(
            "w".parse::<SlicingMode>(),
            Err(ParseSlicingModeError::UnknownName("w".to_string()))
        );
        assert_eq!(
            SlicingMode::try_from(6),
            Err(ParseSlicingModeError::IndexOutOfRange(6))
        );
    }

    #[test]
    fn index_round_trips_through_all() {
        for (i, mode) in SlicingMode::ALL.iter().enumerate() {
            assert_eq!(SlicingMode::try_from(i), Ok(*mode));
        }
    }

    #[test]
    fn default_mode_is_j() {
        assert_eq!(SlicingMode::default(), SlicingMode::J);
    }
}
