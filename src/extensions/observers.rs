use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, Interval, ManualPoint};
use crate::interaction::{GestureMode, HoverTarget, TraceMarker};

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotContext {
    pub domain: Interval,
    pub range: Interval,
    pub gesture_mode: GestureMode,
    pub layers_len: usize,
    pub manual_points_len: usize,
}

/// Event stream exposed to observers.
///
/// Observers stand in for the host's viewport consumer and manual point
/// store: the engine never allocates point ids, it only reports requested
/// additions and replacement lists after drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotEvent {
    LayersChanged { layers_len: usize },
    ViewportChanged { domain: Interval, range: Interval },
    FrameRecomputed { visible_layers: usize, features: usize },
    TaylorCurvesRecomputed { curves: usize },
    AddPointRequested(DataPoint),
    ManualPointsReplaced(Vec<ManualPoint>),
    GestureChanged { from: GestureMode, to: GestureMode },
    HoverChanged(Option<HoverTarget>),
    TraceMoved(TraceMarker),
    PointerLeft,
}

/// Extension hook interface.
///
/// Observers see events and engine context but cannot mutate engine state.
pub trait PlotObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &PlotEvent, context: PlotContext);
}
