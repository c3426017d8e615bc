use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::evaluator::{Evaluator, evaluate_finite};
use crate::core::features::Feature;
use crate::core::hit_test::{
    hit_manual_point, is_near_y_axis, nearest_curve_sample, nearest_feature,
};
use crate::core::sampler::Sample;
use crate::core::types::{DataPoint, ManualPoint, PixelPoint};
use crate::core::viewport::{AxisLock, Viewport};

use super::{
    GestureEffect, GestureEffects, GestureMode, HoverTarget, PointerButton, PointerInput,
    TraceMarker, WheelZoomConfig,
};

/// Visible layer as seen by hit-testing and curve tracing.
#[derive(Clone, Copy)]
pub struct CurveView<'a> {
    pub layer_index: usize,
    pub evaluator: &'a dyn Evaluator,
    /// Primary series for the current cycle.
    pub samples: &'a [Sample],
}

/// Everything a transition may read, plus the viewport it may move.
pub struct GestureContext<'a> {
    pub viewport: &'a mut Viewport,
    pub manual_points: &'a [ManualPoint],
    pub curves: &'a [CurveView<'a>],
    pub features: &'a [Feature],
    /// Layer whose `f(0)` is reported when hovering the y axis.
    pub intercept_layer: Option<&'a dyn Evaluator>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    Panning {
        pointer_id: u64,
        last: PixelPoint,
        lock: Option<AxisLock>,
    },
    DraggingPoint {
        pointer_id: u64,
        point_id: u64,
        origin: DataPoint,
        origin_px: PixelPoint,
        lock: Option<AxisLock>,
    },
    TracingCurve {
        pointer_id: u64,
        layer_index: usize,
    },
    Pinching {
        baseline: Viewport,
        anchor: PixelPoint,
        start_distance: f64,
    },
}

impl GestureState {
    fn mode(&self) -> GestureMode {
        match self {
            Self::Idle => GestureMode::Idle,
            Self::Panning { .. } => GestureMode::Panning,
            Self::DraggingPoint { .. } => GestureMode::DraggingPoint,
            Self::TracingCurve { .. } => GestureMode::TracingCurve,
            Self::Pinching { .. } => GestureMode::Pinching,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    id: u64,
    position: PixelPoint,
}

/// Pointer and wheel state machine.
///
/// All state lives in one value and changes only through the named
/// transitions below. Side effects on data the controller does not own
/// (manual points, recompute scheduling) are returned as [`GestureEffect`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureController {
    state: GestureState,
    pointers: SmallVec<[ActivePointer; 2]>,
    hover: Option<HoverTarget>,
    trace_marker: Option<TraceMarker>,
    wheel: WheelZoomConfig,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(WheelZoomConfig::default())
    }
}

impl GestureController {
    #[must_use]
    pub fn new(wheel: WheelZoomConfig) -> Self {
        Self {
            state: GestureState::Idle,
            pointers: SmallVec::new(),
            hover: None,
            trace_marker: None,
            wheel,
        }
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.state.mode()
    }

    #[must_use]
    pub fn hover(&self) -> Option<HoverTarget> {
        self.hover
    }

    #[must_use]
    pub fn trace_marker(&self) -> Option<TraceMarker> {
        self.trace_marker
    }

    #[must_use]
    pub fn active_pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Axis lock engaged by the running pan or point drag.
    #[must_use]
    pub fn axis_lock(&self) -> Option<AxisLock> {
        match self.state {
            GestureState::Panning { lock, .. } | GestureState::DraggingPoint { lock, .. } => lock,
            _ => None,
        }
    }

    #[must_use]
    pub fn wheel_config(&self) -> WheelZoomConfig {
        self.wheel
    }

    pub fn set_wheel_config(&mut self, wheel: WheelZoomConfig) {
        self.wheel = wheel;
    }

    pub fn pointer_down(
        &mut self,
        input: PointerInput,
        ctx: &mut GestureContext<'_>,
    ) -> GestureEffects {
        let mut effects = GestureEffects::new();
        match self.pointers.iter().position(|p| p.id == input.pointer_id) {
            Some(index) => self.pointers[index].position = input.position,
            None if self.pointers.len() < 2 => self.pointers.push(ActivePointer {
                id: input.pointer_id,
                position: input.position,
            }),
            None => return effects,
        }

        if self.pointers.len() == 2 {
            if !matches!(self.state, GestureState::Pinching { .. }) {
                self.begin_pinch(ctx.viewport, &mut effects);
            }
            return effects;
        }
        if self.state != GestureState::Idle || !ctx.viewport.area().contains(input.position) {
            return effects;
        }

        let pointer_id = input.pointer_id;
        let position = input.position;
        match input.button {
            PointerButton::Primary if input.modifiers.add_point => {
                let at = ctx.viewport.pixel_to_data(position);
                effects.push(GestureEffect::AddPointRequested(at));
            }
            PointerButton::Primary => {
                if let Some(point_id) = hit_manual_point(ctx.manual_points, ctx.viewport, position)
                {
                    let origin = ctx
                        .manual_points
                        .iter()
                        .find(|p| p.id == point_id)
                        .map_or_else(
                            || ctx.viewport.pixel_to_data(position),
                            |p| DataPoint::new(p.x, p.y),
                        );
                    let origin_px = ctx.viewport.data_to_pixel(origin);
                    self.enter(
                        GestureState::DraggingPoint {
                            pointer_id,
                            point_id,
                            origin,
                            origin_px,
                            lock: None,
                        },
                        &mut effects,
                    );
                } else if let Some(marker) = snap_to_curve(ctx, position) {
                    self.enter(
                        GestureState::TracingCurve {
                            pointer_id,
                            layer_index: marker.layer_index,
                        },
                        &mut effects,
                    );
                    self.trace_marker = Some(marker);
                    effects.push(GestureEffect::TraceUpdated(marker));
                } else {
                    self.begin_pan(pointer_id, position, &mut effects);
                }
            }
            PointerButton::Middle => self.begin_pan(pointer_id, position, &mut effects),
            PointerButton::Secondary => {}
        }
        effects
    }

    pub fn pointer_move(
        &mut self,
        input: PointerInput,
        ctx: &mut GestureContext<'_>,
    ) -> GestureEffects {
        let mut effects = GestureEffects::new();
        if let Some(active) = self.pointers.iter_mut().find(|p| p.id == input.pointer_id) {
            active.position = input.position;
        }
        let position = input.position;

        match self.state {
            GestureState::Idle => self.update_hover(ctx, position, &mut effects),
            GestureState::Panning {
                pointer_id,
                last,
                lock,
            } if pointer_id == input.pointer_id => {
                let (dx, dy) = (position.x - last.x, position.y - last.y);
                let lock = engage_lock(lock, input.modifiers.axis_lock, dx, dy);
                let (dx, dy) = lock.map_or((dx, dy), |l| l.apply(dx, dy));
                self.state = GestureState::Panning {
                    pointer_id,
                    last: position,
                    lock,
                };
                if dx != 0.0 || dy != 0.0 {
                    match ctx.viewport.pan_by(dx, dy) {
                        Ok(()) => effects.push(GestureEffect::ViewportChanged),
                        Err(err) => warn!(error = %err, "skipping pan step"),
                    }
                }
            }
            GestureState::DraggingPoint {
                pointer_id,
                point_id,
                origin,
                origin_px,
                lock,
            } if pointer_id == input.pointer_id => {
                let lock = engage_lock(
                    lock,
                    input.modifiers.axis_lock,
                    position.x - origin_px.x,
                    position.y - origin_px.y,
                );
                let free = ctx.viewport.pixel_to_data(position);
                let moved = match lock {
                    Some(AxisLock::X) => DataPoint::new(free.x, origin.y),
                    Some(AxisLock::Y) => DataPoint::new(origin.x, free.y),
                    None => free,
                };
                self.state = GestureState::DraggingPoint {
                    pointer_id,
                    point_id,
                    origin,
                    origin_px,
                    lock,
                };
                effects.push(GestureEffect::PointMoved {
                    id: point_id,
                    position: moved,
                });
            }
            GestureState::TracingCurve {
                pointer_id,
                layer_index,
            } if pointer_id == input.pointer_id => {
                if let Some(marker) = trace_layer_at(ctx, layer_index, position) {
                    self.trace_marker = Some(marker);
                    effects.push(GestureEffect::TraceUpdated(marker));
                }
            }
            GestureState::Pinching {
                baseline,
                anchor,
                start_distance,
            } if self.pointers.len() == 2 => {
                let current = self.pointers[0].position.distance(self.pointers[1].position);
                if current > 0.0 && current.is_finite() && start_distance > 0.0 {
                    match baseline.zoomed(start_distance / current, anchor) {
                        Ok(next) => {
                            *ctx.viewport = next;
                            effects.push(GestureEffect::ViewportChanged);
                        }
                        Err(err) => warn!(error = %err, "skipping pinch step"),
                    }
                }
            }
            _ => {}
        }
        effects
    }

    pub fn pointer_up(&mut self, pointer_id: u64) -> GestureEffects {
        let mut effects = GestureEffects::new();
        self.pointers.retain(|p| p.id != pointer_id);
        let ends = match self.state {
            GestureState::Idle => false,
            GestureState::Pinching { .. } => self.pointers.len() < 2,
            GestureState::Panning { pointer_id: owner, .. }
            | GestureState::DraggingPoint { pointer_id: owner, .. }
            | GestureState::TracingCurve { pointer_id: owner, .. } => owner == pointer_id,
        };
        if ends {
            self.enter(GestureState::Idle, &mut effects);
        }
        effects
    }

    /// Pointer left the plot: forget every pointer and end any gesture.
    pub fn pointer_leave(&mut self) -> GestureEffects {
        let mut effects = GestureEffects::new();
        self.pointers.clear();
        self.enter(GestureState::Idle, &mut effects);
        if self.hover.take().is_some() {
            effects.push(GestureEffect::HoverChanged(None));
        }
        effects
    }

    /// Zooms around the cursor. Events outside the plot area are ignored.
    pub fn wheel(
        &mut self,
        position: PixelPoint,
        delta_y: f64,
        ctx: &mut GestureContext<'_>,
    ) -> GestureEffects {
        let mut effects = GestureEffects::new();
        if !delta_y.is_finite() || !ctx.viewport.area().contains(position) {
            return effects;
        }
        match ctx
            .viewport
            .zoom_around(self.wheel.factor(delta_y), position)
        {
            Ok(()) => effects.push(GestureEffect::ViewportChanged),
            Err(err) => warn!(error = %err, "skipping wheel zoom"),
        }
        effects
    }

    fn begin_pan(&mut self, pointer_id: u64, position: PixelPoint, effects: &mut GestureEffects) {
        self.enter(
            GestureState::Panning {
                pointer_id,
                last: position,
                lock: None,
            },
            effects,
        );
    }

    fn begin_pinch(&mut self, viewport: &Viewport, effects: &mut GestureEffects) {
        let (a, b) = (self.pointers[0].position, self.pointers[1].position);
        self.enter(
            GestureState::Pinching {
                baseline: *viewport,
                anchor: a.midpoint(b),
                start_distance: a.distance(b),
            },
            effects,
        );
    }

    fn enter(&mut self, next: GestureState, effects: &mut GestureEffects) {
        let from = self.state.mode();
        let to = next.mode();
        self.state = next;
        if to != GestureMode::TracingCurve {
            self.trace_marker = None;
        }
        if to != GestureMode::Idle && self.hover.take().is_some() {
            effects.push(GestureEffect::HoverChanged(None));
        }
        if from != to {
            trace!(?from, ?to, "gesture transition");
            effects.push(GestureEffect::ModeChanged { from, to });
        }
    }

    fn update_hover(
        &mut self,
        ctx: &GestureContext<'_>,
        position: PixelPoint,
        effects: &mut GestureEffects,
    ) {
        let next = hover_at(ctx, position);
        if next != self.hover {
            self.hover = next;
            effects.push(GestureEffect::HoverChanged(next));
        }
    }
}

/// Keeps an engaged lock; otherwise engages one from the first non-zero
/// delta seen while the lock modifier is held.
fn engage_lock(current: Option<AxisLock>, requested: bool, dx: f64, dy: f64) -> Option<AxisLock> {
    match current {
        Some(lock) => Some(lock),
        None if requested && (dx != 0.0 || dy != 0.0) => Some(AxisLock::decide(dx, dy)),
        None => None,
    }
}

fn snap_to_curve(ctx: &GestureContext<'_>, position: PixelPoint) -> Option<TraceMarker> {
    let series: SmallVec<[&[Sample]; 4]> = ctx.curves.iter().map(|c| c.samples).collect();
    let hit = nearest_curve_sample(&series, ctx.viewport, position)?;
    Some(TraceMarker {
        layer_index: ctx.curves[hit.series_index].layer_index,
        position: DataPoint::new(hit.x, hit.y),
    })
}

/// Live value under the pointer, or the nearest sample's raw value when
/// the evaluator gives nothing finite there.
fn trace_layer_at(
    ctx: &GestureContext<'_>,
    layer_index: usize,
    position: PixelPoint,
) -> Option<TraceMarker> {
    let curve = ctx.curves.iter().find(|c| c.layer_index == layer_index)?;
    let x = ctx.viewport.pixel_to_data(position).x;
    let mut y = evaluate_finite(curve.evaluator, x);
    if !y.is_finite() {
        if let Some(nearest) = curve
            .samples
            .iter()
            .min_by_key(|s| OrderedFloat((s.x - x).abs()))
        {
            y = nearest.y_raw;
        }
    }
    Some(TraceMarker {
        layer_index,
        position: DataPoint::new(x, y),
    })
}

fn hover_at(ctx: &GestureContext<'_>, position: PixelPoint) -> Option<HoverTarget> {
    let viewport: &Viewport = &*ctx.viewport;
    if !viewport.area().contains(position) {
        return None;
    }
    if let Some(id) = hit_manual_point(ctx.manual_points, viewport, position) {
        return Some(HoverTarget::ManualPoint(id));
    }
    if let Some(feature) = nearest_feature(&[ctx.features], viewport, position) {
        return Some(HoverTarget::Feature(feature));
    }
    if is_near_y_axis(viewport, position) {
        let y = evaluate_finite(ctx.intercept_layer?, 0.0);
        if y.is_finite() {
            return Some(HoverTarget::YAxisIntercept(DataPoint::new(0.0, y)));
        }
    }
    None
}
