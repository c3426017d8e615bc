use crate::extensions::PlotContext;

use super::{PlotEngine, PlotEvent};

impl PlotEngine {
    #[must_use]
    pub fn observer_context(&self) -> PlotContext {
        PlotContext {
            domain: self.viewport.domain(),
            range: self.viewport.range(),
            gesture_mode: self.gestures.mode(),
            layers_len: self.layers.len(),
            manual_points_len: self.manual_points.len(),
        }
    }

    pub(super) fn emit_event(&mut self, event: PlotEvent) {
        if self.observers.is_empty() {
            return;
        }
        let context = self.observer_context();
        for observer in &mut self.observers {
            observer.on_event(&event, context);
        }
    }
}
