use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::extensions::PlotObserver;

use super::PlotEngine;

impl PlotEngine {
    /// Attaches an observer to the engine's event stream.
    ///
    /// Observers receive every [`PlotEvent`](crate::extensions::PlotEvent) in
    /// registration order. The id is how hosts detach it again, so it must be
    /// non-empty and not already attached.
    pub fn register_observer(&mut self, observer: Box<dyn PlotObserver>) -> PlotResult<()> {
        let id = observer.id();
        if id.is_empty() {
            return Err(PlotError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(id) {
            return Err(PlotError::InvalidData(format!(
                "observer `{id}` is already attached"
            )));
        }

        debug!(observer = id, attached = self.observers.len() + 1, "observer attached");
        self.observers.push(observer);
        Ok(())
    }

    /// Detaches the observer with `observer_id`; later events skip it.
    ///
    /// Returns `false` when no such observer was attached.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id() != observer_id);
        let detached = self.observers.len() < before;
        if detached {
            debug!(observer = observer_id, "observer detached");
        }
        detached
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }
}
