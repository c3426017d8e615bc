use serde::{Deserialize, Serialize};

use crate::core::features::Feature;
use crate::core::types::{Interval, ManualPoint};
use crate::error::{PlotError, PlotResult};
use crate::interaction::{GestureMode, HoverTarget, TraceMarker};

use super::{LayerId, PlotEngine, TaylorCurve};

/// Per-layer summary of the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub id: LayerId,
    pub expression: String,
    pub hidden: bool,
    pub roots: Vec<Feature>,
    pub extrema: Vec<Feature>,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub domain: Interval,
    pub range: Interval,
    pub suggested_range: Interval,
    pub primary_samples: usize,
    pub derivative_samples: usize,
    pub gesture_mode: GestureMode,
    pub hover: Option<HoverTarget>,
    pub trace_marker: Option<TraceMarker>,
    pub layers: Vec<LayerSnapshot>,
    pub intersections: Vec<Feature>,
    pub manual_points: Vec<ManualPoint>,
    pub taylor_curves: Vec<TaylorCurve>,
    pub taylor_recompute_pending: bool,
}

impl PlotEngine {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                let frame = self.frame.layer(layer.id());
                LayerSnapshot {
                    id: layer.id(),
                    expression: layer.expression().source().to_owned(),
                    hidden: frame.is_none_or(|frame| frame.hidden),
                    roots: frame.map(|frame| frame.roots.clone()).unwrap_or_default(),
                    extrema: frame
                        .map(|frame| frame.extrema.clone())
                        .unwrap_or_default(),
                }
            })
            .collect();

        EngineSnapshot {
            domain: self.viewport.domain(),
            range: self.viewport.range(),
            suggested_range: self.frame.suggested_range,
            primary_samples: self.frame.primary_samples,
            derivative_samples: self.frame.derivative_samples,
            gesture_mode: self.gestures.mode(),
            hover: self.gestures.hover(),
            trace_marker: self.gestures.trace_marker(),
            layers,
            intersections: self.frame.intersections.clone(),
            manual_points: self.manual_points.clone(),
            taylor_curves: self.taylor_curves.values().cloned().collect(),
            taylor_recompute_pending: self.taylor_task.is_pending(),
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| PlotError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
