use crate::contrast::ContrastModel;
use crate::enums::GestureChannel;
use crate::slice_domain::{SliceRange, round_half_up};

/// Step counts this close to a whole number count as that whole number.
const STEP_EPSILON: f64 = 1e-9;

/// Numeric domain of a gesture channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelDomain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ChannelDomain {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Span of the domain, used to scale pixel drags.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Snaps `value` to the nearest multiple of `step`, then clamps it.
    pub fn snap(&self, value: f64) -> f64 {
        self.clamp(round_half_up(value / self.step) * self.step)
    }

    /// Moves `current` by `steps` whole steps and snaps the result.
    pub fn advance(&self, current: f64, steps: f64) -> f64 {
        self.snap(current + steps * self.step)
    }
}

impl From<SliceRange> for ChannelDomain {
    fn from(range: SliceRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
            step: range.step,
        }
    }
}

/// Raw pointer input, before it is routed to a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    /// Pointer motion in pixels since the last event. `dy` is positive upwards.
    Drag {
        dx: f64,
        dy: f64,
        primary: bool,
        modifier: bool,
    },
    /// Wheel motion in notches, positive away from the user.
    Scroll { ticks: f64 },
}

/// Value a channel setter writes back into viewer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelUpdate {
    Window(f64),
    Level(f64),
    Slice(f64),
}

/// A channel's domain plus the fraction of a step not yet applied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RangeManipulator {
    domain: ChannelDomain,
    residual_steps: f64,
}

impl RangeManipulator {
    fn new(domain: ChannelDomain) -> Self {
        Self {
            domain,
            residual_steps: 0.0,
        }
    }

    /// Moves `current` by the whole steps in `steps` plus the carried
    /// fraction. The new fraction is kept for the next call. `current` is
    /// returned untouched until a whole step has built up.
    fn advance(&mut self, current: f64, steps: f64) -> f64 {
        let total = self.residual_steps + steps;
        let nearest = total.round();
        let whole = if (total - nearest).abs() < STEP_EPSILON {
            nearest
        } else {
            total.trunc()
        };
        self.residual_steps = total - whole;
        if whole == 0.0 {
            return current;
        }
        self.domain.advance(current, whole)
    }
}

/// Bindings of the three gesture channels to window, level and slice.
///
/// Window and level channels are inverted: the reported value `v` maps to
/// `window = max_width + 1 - v` and `level = (range_min + range_max) - v`, so
/// dragging right or up raises the window or level. Getters always read the
/// state passed in, nothing is cached between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionBindings {
    window: RangeManipulator,
    level: RangeManipulator,
    slice: RangeManipulator,
    max_width: f64,
    level_sum: f64,
    drag_span_px: f64,
}

impl InteractionBindings {
    pub fn new(
        contrast: &ContrastModel,
        slices: &SliceRange,
        contrast_step: f64,
        drag_span_px: f64,
    ) -> Self {
        let (min, max) = contrast.range();
        let max_width = contrast.max_width();
        let step = if contrast_step > 0.0 { contrast_step } else { 1.0 };
        Self {
            window: RangeManipulator::new(ChannelDomain {
                min: 1.0,
                max: max_width + 1.0,
                step,
            }),
            level: RangeManipulator::new(ChannelDomain { min, max, step }),
            slice: RangeManipulator::new((*slices).into()),
            max_width,
            level_sum: min + max,
            drag_span_px: drag_span_px.max(1.0),
        }
    }

    /// Replaces the scroll channel's domain after a mode change.
    pub fn rebind_slice(&mut self, slices: &SliceRange) {
        self.slice = RangeManipulator::new((*slices).into());
    }

    pub fn domain(&self, channel: GestureChannel) -> ChannelDomain {
        self.manipulator(channel).domain
    }

    /// Channel getter: the value the manipulator reports for the current state.
    pub fn value(&self, channel: GestureChannel, contrast: &ContrastModel, slice: f64) -> f64 {
        match channel {
            GestureChannel::HorizontalDrag => self.max_width + 1.0 - contrast.window(),
            GestureChannel::VerticalDrag => self.level_sum - contrast.level(),
            GestureChannel::Scroll => slice,
        }
    }

    /// Channel setter: maps a reported value back to window, level or slice.
    /// The window never drops below 1 through a gesture.
    pub fn update(&self, channel: GestureChannel, value: f64) -> ChannelUpdate {
        match channel {
            GestureChannel::HorizontalDrag => {
                ChannelUpdate::Window((self.max_width + 1.0 - value).max(1.0))
            }
            GestureChannel::VerticalDrag => ChannelUpdate::Level(self.level_sum - value),
            GestureChannel::Scroll => ChannelUpdate::Slice(value),
        }
    }

    /// Splits a pointer gesture into per-channel deltas counted in channel
    /// steps. Drags without the primary button and modifier belong to camera
    /// navigation and yield nothing.
    pub fn route(&self, gesture: &PointerGesture) -> Vec<(GestureChannel, f64)> {
        let mut deltas = Vec::with_capacity(2);
        match *gesture {
            PointerGesture::Drag {
                dx,
                dy,
                primary: true,
                modifier: true,
            } => {
                if dx != 0.0 {
                    let steps = -dx * self.drag_scale(&self.window);
                    deltas.push((GestureChannel::HorizontalDrag, steps));
                }
                if dy != 0.0 {
                    let steps = -dy * self.drag_scale(&self.level);
                    deltas.push((GestureChannel::VerticalDrag, steps));
                }
            }
            PointerGesture::Drag { .. } => {}
            PointerGesture::Scroll { ticks } => {
                if ticks != 0.0 {
                    deltas.push((GestureChannel::Scroll, ticks));
                }
            }
        }
        deltas
    }

    /// Advances a channel's reported value by `steps`, applying whole steps
    /// only. The result is snapped to the step grid and clamped to the
    /// channel domain.
    pub fn advance(&mut self, channel: GestureChannel, current: f64, steps: f64) -> f64 {
        self.manipulator_mut(channel).advance(current, steps)
    }

    /// Steps per dragged pixel, so that `drag_span_px` pixels cross the
    /// whole domain.
    fn drag_scale(&self, manipulator: &RangeManipulator) -> f64 {
        manipulator.domain.span() / manipulator.domain.step / self.drag_span_px
    }

    fn manipulator(&self, channel: GestureChannel) -> &RangeManipulator {
        match channel {
            GestureChannel::HorizontalDrag => &self.window,
            GestureChannel::VerticalDrag => &self.level,
            GestureChannel::Scroll => &self.slice,
        }
    }

    fn manipulator_mut(&mut self, channel: GestureChannel) -> &mut RangeManipulator {
        match channel {
            GestureChannel::HorizontalDrag => &mut self.window,
            GestureChannel::VerticalDrag => &mut self.level,
            GestureChannel::Scroll => &mut self.slice,
        }
    }
}
