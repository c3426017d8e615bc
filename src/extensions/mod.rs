//! Host-facing hooks.
//!
//! Keep extensions free of engine internals; they only receive events and
//! read-only context.

pub mod observers;

pub use observers::{PlotContext, PlotEvent, PlotObserver};
