use indexmap::IndexMap;
use tracing::debug;

use crate::core::taylor::TaylorCache;
use crate::core::viewport::Viewport;
use crate::error::PlotResult;
use crate::interaction::{GestureController, RecomputeTask};

use super::{PlotEngine, PlotEngineConfig, PlotFrame};

impl PlotEngine {
    /// Creates an engine with no layers and no manual points.
    ///
    /// Without an explicit range the y scale matches the x scale and is
    /// centred on 0.
    pub fn new(config: PlotEngineConfig) -> PlotResult<Self> {
        let config = config.validate()?;
        let viewport = match config.range {
            Some(range) => Viewport::new(config.area, config.domain, range)?,
            None => Viewport::matched(config.area, config.domain)?,
        };

        debug!(
            width = config.area.width,
            height = config.area.height,
            domain_min = config.domain.min,
            domain_max = config.domain.max,
            "plot engine initialized"
        );

        Ok(Self {
            frame: PlotFrame::empty(&viewport, config.fallback_range),
            gestures: GestureController::new(config.wheel_zoom),
            taylor_task: RecomputeTask::new(config.taylor.debounce()),
            taylor_cache: TaylorCache::new(),
            taylor_curves: IndexMap::new(),
            layers: Vec::new(),
            manual_points: Vec::new(),
            observers: Vec::new(),
            viewport,
            config,
        })
    }
}
