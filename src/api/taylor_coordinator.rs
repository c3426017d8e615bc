use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::gap_filler::fill_series;
use crate::core::sampler::sample_interval;
use crate::core::taylor::{TaylorKey, taylor_from_expr};

use super::{LayerId, PlotEngine, PlotEvent, TaylorCurve};

impl PlotEngine {
    /// Advances the debounce clock by host-measured time.
    ///
    /// Returns `true` when the pending Taylor recompute fired during this
    /// call.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.taylor_task.advance(elapsed) {
            return false;
        }
        self.recompute_taylor_curves();
        true
    }

    #[must_use]
    pub fn is_taylor_recompute_pending(&self) -> bool {
        self.taylor_task.is_pending()
    }

    #[must_use]
    pub fn taylor_curve(&self, id: LayerId) -> Option<&TaylorCurve> {
        self.taylor_curves.get(&id)
    }

    pub fn taylor_curves(&self) -> impl Iterator<Item = &TaylorCurve> {
        self.taylor_curves.values()
    }

    #[must_use]
    pub fn taylor_cache_len(&self) -> usize {
        self.taylor_cache.len()
    }

    /// Rebuilds every Taylor overlay over the current domain now.
    ///
    /// Layers without a shown overlay lose their curve, and polynomials no
    /// longer referenced by any layer are evicted from the cache.
    pub fn recompute_taylor_curves(&mut self) {
        self.taylor_task.cancel();
        let domain = self.viewport.domain();
        let samples = self.config.taylor.samples;

        let mut curves = IndexMap::with_capacity(self.layers.len());
        let mut referenced: Vec<TaylorKey> = Vec::new();
        for layer in &self.layers {
            let Some(key) = layer.taylor_key() else {
                continue;
            };
            let polynomial = taylor_from_expr(
                &mut self.taylor_cache,
                layer.expression(),
                || Arc::clone(layer.evaluator()),
                layer.taylor_center(),
                layer.taylor().degree,
            );
            let points = fill_series(&sample_interval(polynomial.as_ref(), domain, samples));
            curves.insert(
                layer.id(),
                TaylorCurve {
                    layer_id: layer.id(),
                    center: polynomial.center(),
                    terms: polynomial.terms().to_vec(),
                    points,
                },
            );
            referenced.push(key);
        }

        let evicted = self.taylor_cache.retain_referenced(referenced.iter());
        self.taylor_curves = curves;
        debug!(
            curves = self.taylor_curves.len(),
            cached = self.taylor_cache.len(),
            evicted,
            "taylor curves recomputed"
        );
        let curves = self.taylor_curves.len();
        self.emit_event(PlotEvent::TaylorCurvesRecomputed { curves });
    }

    /// Restarts the debounce window unless a pan or pinch holds it back.
    pub(super) fn reschedule_taylor(&mut self) {
        if self.gestures.mode().suppresses_recompute() {
            self.taylor_task.cancel();
        } else {
            self.taylor_task.schedule();
        }
    }
}
