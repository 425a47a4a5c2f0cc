use crate::slice_domain::round_half_up;

/// Window (contrast width) and level (contrast centre).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastState {
    pub window: f64,
    pub level: f64,
}

/// Window/level state of the loaded volume.
///
/// Setters report whether the value changed. Assigning the current value is a
/// no-op so pointer-move ticks that land on the same value do not trigger a
/// redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastModel {
    state: ContrastState,
    range: (f64, f64),
}

impl ContrastModel {
    /// Initial window spans the whole intensity range, level sits at its
    /// rounded centre.
    pub fn from_range(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            state: ContrastState {
                window: max - min,
                level: round_half_up((min + max) / 2.0),
            },
            range: (min, max),
        }
    }

    pub fn state(&self) -> ContrastState {
        self.state
    }

    pub fn window(&self) -> f64 {
        self.state.window
    }

    pub fn level(&self) -> f64 {
        self.state.level
    }

    /// Intensity range the model was built from.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Width of the full intensity range, the initial window.
    pub fn max_width(&self) -> f64 {
        self.range.1 - self.range.0
    }

    /// Negative widths are stored as 0.
    pub fn set_window(&mut self, window: f64) -> bool {
        let window = window.max(0.0);
        if window == self.state.window {
            return false;
        }
        self.state.window = window;
        true
    }

    pub fn set_level(&mut self, level: f64) -> bool {
        if level == self.state.level {
            return false;
        }
        self.state.level = level;
        true
    }
}
