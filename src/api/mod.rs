mod engine;
mod engine_config;
mod engine_init;
mod engine_snapshot;
mod frame_builder;
mod interaction_coordinator;
mod layer;
mod layer_coordinator;
mod manual_point_coordinator;
mod observer_dispatch;
mod observer_registry;
mod taylor_coordinator;
mod viewport_coordinator;

pub use engine::{PlotEngine, TaylorCurve};
pub use engine_config::{FeatureToggles, PlotEngineConfig, TaylorOverlayConfig};
pub use engine_snapshot::{EngineSnapshot, LayerSnapshot};
pub use frame_builder::{LayerFrame, PlotFrame, build_frame};
pub use layer::{Layer, LayerId, TaylorSettings};
pub use viewport_coordinator::{ZOOM_IN_SCALE, ZOOM_OUT_SCALE};

pub use crate::extensions::{PlotContext, PlotEvent, PlotObserver};
