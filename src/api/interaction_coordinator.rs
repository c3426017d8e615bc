use crate::core::evaluator::Evaluator;
use crate::core::types::PixelPoint;
use crate::interaction::{
    CurveView, GestureContext, GestureController, GestureEffect, GestureEffects, GestureMode,
    HoverTarget, PointerInput, TraceMarker, WheelZoomConfig,
};

use super::{FeatureToggles, Layer, LayerId, PlotEngine, PlotEvent, PlotFrame};

impl PlotEngine {
    #[must_use]
    pub fn gesture_mode(&self) -> GestureMode {
        self.gestures.mode()
    }

    #[must_use]
    pub fn hover_target(&self) -> Option<HoverTarget> {
        self.gestures.hover()
    }

    #[must_use]
    pub fn trace_marker(&self) -> Option<TraceMarker> {
        self.gestures.trace_marker()
    }

    /// Layer currently being traced.
    #[must_use]
    pub fn traced_layer(&self) -> Option<LayerId> {
        let marker = self.gestures.trace_marker()?;
        self.layers.get(marker.layer_index).map(Layer::id)
    }

    #[must_use]
    pub fn wheel_zoom_config(&self) -> WheelZoomConfig {
        self.gestures.wheel_config()
    }

    pub fn set_wheel_zoom_config(&mut self, wheel: WheelZoomConfig) {
        self.config.wheel_zoom = wheel;
        self.gestures.set_wheel_config(wheel);
    }

    pub fn pointer_down(&mut self, input: PointerInput) {
        self.run_gesture(|gestures, ctx| gestures.pointer_down(input, ctx));
    }

    pub fn pointer_move(&mut self, input: PointerInput) {
        self.run_gesture(|gestures, ctx| gestures.pointer_move(input, ctx));
    }

    pub fn pointer_up(&mut self, pointer_id: u64) {
        let effects = self.gestures.pointer_up(pointer_id);
        self.apply_gesture_effects(effects);
    }

    pub fn pointer_leave(&mut self) {
        let effects = self.gestures.pointer_leave();
        self.apply_gesture_effects(effects);
        self.emit_event(PlotEvent::PointerLeft);
    }

    /// Wheel zoom around `position`. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, position: PixelPoint, delta_y: f64) {
        self.run_gesture(|gestures, ctx| gestures.wheel(position, delta_y, ctx));
    }

    fn run_gesture<F>(&mut self, transition: F)
    where
        F: FnOnce(&mut GestureController, &mut GestureContext<'_>) -> GestureEffects,
    {
        let curves = curve_views(&self.layers, &self.frame);
        let features = self.frame.features();
        let intercept_layer = intercept_layer(&self.layers, &self.frame, self.config.features);
        let mut ctx = GestureContext {
            viewport: &mut self.viewport,
            manual_points: &self.manual_points,
            curves: &curves,
            features: &features,
            intercept_layer,
        };
        let effects = transition(&mut self.gestures, &mut ctx);
        self.apply_gesture_effects(effects);
    }

    fn apply_gesture_effects(&mut self, effects: GestureEffects) {
        let mut viewport_changed = false;
        let mut points_changed = false;

        for effect in effects {
            match effect {
                GestureEffect::AddPointRequested(at) => {
                    self.emit_event(PlotEvent::AddPointRequested(at));
                }
                GestureEffect::PointMoved { id, position } => {
                    if let Some(point) = self.manual_points.iter_mut().find(|p| p.id == id) {
                        point.x = position.x;
                        point.y = position.y;
                        points_changed = true;
                    }
                }
                GestureEffect::ViewportChanged => viewport_changed = true,
                GestureEffect::TraceUpdated(marker) => {
                    self.emit_event(PlotEvent::TraceMoved(marker));
                }
                GestureEffect::HoverChanged(target) => {
                    self.emit_event(PlotEvent::HoverChanged(target));
                }
                GestureEffect::ModeChanged { from, to } => {
                    if to.suppresses_recompute() {
                        self.taylor_task.cancel();
                    } else if from.suppresses_recompute() {
                        self.taylor_task.schedule();
                    }
                    self.emit_event(PlotEvent::GestureChanged { from, to });
                }
            }
        }

        if points_changed {
            self.emit_manual_points_replaced();
        }
        if viewport_changed {
            self.on_viewport_changed();
        }
    }
}

/// Visible layers paired with their primary series.
fn curve_views<'a>(layers: &'a [Layer], frame: &'a PlotFrame) -> Vec<CurveView<'a>> {
    layers
        .iter()
        .enumerate()
        .filter_map(|(layer_index, layer)| {
            let layer_frame = frame.layer(layer.id())?;
            (!layer_frame.hidden).then(|| CurveView {
                layer_index,
                evaluator: layer.evaluator().as_ref(),
                samples: &layer_frame.samples,
            })
        })
        .collect()
}

/// First layer, when visible and y-axis hover is enabled.
fn intercept_layer<'a>(
    layers: &'a [Layer],
    frame: &PlotFrame,
    toggles: FeatureToggles,
) -> Option<&'a dyn Evaluator> {
    if !toggles.y_axis_hover {
        return None;
    }
    let first = layers.first()?;
    let visible = frame
        .layer(first.id())
        .is_some_and(|layer_frame| !layer_frame.hidden);
    visible.then(|| first.evaluator().as_ref())
}
