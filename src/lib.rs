//! fnplot-rs: numeric and interaction engine for interactive 2D function
//! plotters.
//!
//! The crate turns host-supplied evaluators into sampled, gap-filled
//! polylines with roots, extrema and intersections, drives a pointer and
//! wheel gesture state machine over a pixel/data viewport, and maintains
//! debounced Taylor overlays. Expression parsing and drawing stay with the
//! host.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod telemetry;

pub use api::{PlotEngine, PlotEngineConfig};
pub use error::{PlotError, PlotResult};
