use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{PlotError, PlotResult};

use super::{
    FeatureToggles, Layer, LayerFrame, LayerId, PlotEngine, PlotEvent, PlotFrame, TaylorSettings,
    build_frame,
};

impl PlotEngine {
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Replaces the whole layer set. Layer ids must be unique.
    pub fn set_layers(&mut self, layers: Vec<Layer>) -> PlotResult<()> {
        let mut seen = HashSet::with_capacity(layers.len());
        if let Some(duplicate) = layers.iter().find(|layer| !seen.insert(layer.id())) {
            return Err(PlotError::InvalidData(format!(
                "layer id {} is used more than once",
                duplicate.id().0
            )));
        }

        debug!(layers = layers.len(), "replacing layer set");
        self.layers = layers;
        self.on_layers_changed();
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Layer) -> PlotResult<()> {
        if self.layer(layer.id()).is_some() {
            return Err(PlotError::InvalidData(format!(
                "layer id {} is already present",
                layer.id().0
            )));
        }
        self.layers.push(layer);
        self.on_layers_changed();
        Ok(())
    }

    /// Removes a layer. Its frozen Taylor curve stays until the next
    /// recompute.
    pub fn remove_layer(&mut self, id: LayerId) -> PlotResult<Layer> {
        let position = self
            .layers
            .iter()
            .position(|layer| layer.id() == id)
            .ok_or(PlotError::UnknownLayer(id.0))?;
        let removed = self.layers.remove(position);
        self.on_layers_changed();
        Ok(removed)
    }

    pub fn set_layer_taylor(&mut self, id: LayerId, taylor: TaylorSettings) -> PlotResult<()> {
        self.layer_mut(id)?.set_taylor(taylor);
        self.reschedule_taylor();
        self.emit_layers_changed();
        Ok(())
    }

    pub fn set_layer_derivative_overlays(
        &mut self,
        id: LayerId,
        first: bool,
        second: bool,
    ) -> PlotResult<()> {
        self.layer_mut(id)?.set_derivative_overlays(first, second);
        self.on_layers_changed();
        Ok(())
    }

    #[must_use]
    pub fn feature_toggles(&self) -> FeatureToggles {
        self.config.features
    }

    pub fn set_feature_toggles(&mut self, toggles: FeatureToggles) {
        self.config.features = toggles;
        self.rebuild_frame();
    }

    /// Derived data of the last cycle.
    #[must_use]
    pub fn frame(&self) -> &PlotFrame {
        &self.frame
    }

    #[must_use]
    pub fn layer_frame(&self, id: LayerId) -> Option<&LayerFrame> {
        self.frame.layer(id)
    }

    fn layer_mut(&mut self, id: LayerId) -> PlotResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id() == id)
            .ok_or(PlotError::UnknownLayer(id.0))
    }

    fn on_layers_changed(&mut self) {
        self.rebuild_frame();
        self.reschedule_taylor();
        self.emit_layers_changed();
    }

    fn emit_layers_changed(&mut self) {
        let layers_len = self.layers.len();
        self.emit_event(PlotEvent::LayersChanged { layers_len });
    }

    pub(super) fn rebuild_frame(&mut self) {
        self.frame = build_frame(
            &self.viewport,
            &self.layers,
            self.config.sampling,
            self.config.features,
            self.config.fallback_range,
        );
        let visible_layers = self.frame.visible_layers();
        let features = self.frame.features().len();
        trace!(visible_layers, features, "frame recomputed");
        self.emit_event(PlotEvent::FrameRecomputed {
            visible_layers,
            features,
        });
    }
}
