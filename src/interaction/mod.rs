use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::features::Feature;
use crate::core::types::{DataPoint, PixelPoint};

mod debounce;
mod gesture_controller;

pub use debounce::RecomputeTask;
pub use gesture_controller::{CurveView, GestureContext, GestureController};

/// Public view of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMode {
    Idle,
    Panning,
    DraggingPoint,
    TracingCurve,
    Pinching,
}

impl GestureMode {
    /// Modes during which the debounced Taylor recompute is held back.
    #[must_use]
    pub fn suppresses_recompute(self) -> bool {
        matches!(self, Self::Panning | Self::Pinching)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Modifier keys, named by what they do rather than by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Primary press adds a manual point instead of starting a gesture.
    pub add_point: bool,
    /// Restricts a drag to its dominant axis.
    pub axis_lock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub pointer_id: u64,
    pub position: PixelPoint,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    #[must_use]
    pub fn primary(pointer_id: u64, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            position: PixelPoint::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn with_axis_lock(mut self) -> Self {
        self.modifiers.axis_lock = true;
        self
    }

    #[must_use]
    pub fn with_add_point(mut self) -> Self {
        self.modifiers.add_point = true;
        self
    }
}

/// Wheel zoom tuning: `factor = exp(sign · min(max_step, |delta| · rate))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelZoomConfig {
    pub rate: f64,
    pub max_step: f64,
}

impl Default for WheelZoomConfig {
    fn default() -> Self {
        Self {
            rate: 0.000_45,
            max_step: 0.12,
        }
    }
}

impl WheelZoomConfig {
    /// Positive `delta_y` zooms out.
    #[must_use]
    pub fn factor(self, delta_y: f64) -> f64 {
        let sign = if delta_y > 0.0 { 1.0 } else { -1.0 };
        (sign * (delta_y.abs() * self.rate).min(self.max_step)).exp()
    }
}

/// What the pointer is hovering while no gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HoverTarget {
    ManualPoint(u64),
    Feature(Feature),
    /// `(0, f(0))` of the first layer.
    YAxisIntercept(DataPoint),
}

/// Live trace marker on one layer. `position.y` may be `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceMarker {
    pub layer_index: usize,
    pub position: DataPoint,
}

/// Side effect of a gesture transition, applied by the owner of the
/// point store and the recompute scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEffect {
    AddPointRequested(DataPoint),
    PointMoved { id: u64, position: DataPoint },
    ViewportChanged,
    TraceUpdated(TraceMarker),
    HoverChanged(Option<HoverTarget>),
    ModeChanged { from: GestureMode, to: GestureMode },
}

pub type GestureEffects = SmallVec<[GestureEffect; 4]>;

#[cfg(test)]
mod tests {
    use super::{GestureMode, WheelZoomConfig};

    #[test]
    fn wheel_factor_is_capped_per_event() {
        let wheel = WheelZoomConfig::default();
        assert!((wheel.factor(10_000.0) - 0.12f64.exp()).abs() <= 1e-12);
        assert!((wheel.factor(-10_000.0) - (-0.12f64).exp()).abs() <= 1e-12);
        assert!((wheel.factor(100.0) - 0.045f64.exp()).abs() <= 1e-12);
    }

    #[test]
    fn only_pan_and_pinch_hold_back_recompute() {
        assert!(GestureMode::Panning.suppresses_recompute());
        assert!(GestureMode::Pinching.suppresses_recompute());
        assert!(!GestureMode::TracingCurve.suppresses_recompute());
        assert!(!GestureMode::Idle.suppresses_recompute());
    }
}
