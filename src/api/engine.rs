use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::taylor::{TaylorCache, TaylorTerm};
use crate::core::types::{DataPoint, ManualPoint};
use crate::core::viewport::Viewport;
use crate::extensions::PlotObserver;
use crate::interaction::{GestureController, RecomputeTask};

use super::{Layer, LayerId, PlotEngineConfig, PlotFrame};

/// Frozen Taylor overlay of one layer.
///
/// Curves are only replaced by a completed recompute, so they stay as they
/// were while a pan or pinch is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaylorCurve {
    pub layer_id: LayerId,
    pub center: f64,
    pub terms: Vec<TaylorTerm>,
    /// Gap-filled samples of the polynomial over the domain at recompute time.
    pub points: Vec<DataPoint>,
}

/// Main orchestration facade consumed by host applications.
///
/// `PlotEngine` owns the viewport, layer set, manual points, gesture state
/// machine and the Taylor overlay scheduler. Hosts feed it pointer input and
/// elapsed time, and read back the derived [`PlotFrame`].
pub struct PlotEngine {
    pub(super) config: PlotEngineConfig,
    pub(super) viewport: Viewport,
    pub(super) layers: Vec<Layer>,
    pub(super) manual_points: Vec<ManualPoint>,
    pub(super) gestures: GestureController,
    pub(super) frame: PlotFrame,
    pub(super) taylor_cache: TaylorCache,
    pub(super) taylor_task: RecomputeTask,
    pub(super) taylor_curves: IndexMap<LayerId, TaylorCurve>,
    pub(super) observers: Vec<Box<dyn PlotObserver>>,
}
