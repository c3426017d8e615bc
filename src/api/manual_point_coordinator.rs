use crate::core::types::{DataPoint, ManualPoint};
use crate::error::{PlotError, PlotResult};

use super::{PlotEngine, PlotEvent};

impl PlotEngine {
    #[must_use]
    pub fn manual_points(&self) -> &[ManualPoint] {
        &self.manual_points
    }

    /// Replaces the host-owned point list, e.g. after an
    /// [`PlotEvent::AddPointRequested`] was accepted.
    pub fn set_manual_points(&mut self, points: Vec<ManualPoint>) -> PlotResult<()> {
        if let Some(point) = points
            .iter()
            .find(|point| !point.x.is_finite() || !point.y.is_finite())
        {
            return Err(PlotError::InvalidData(format!(
                "manual point {} must have finite coordinates",
                point.id
            )));
        }
        self.manual_points = points;
        Ok(())
    }

    /// Moves one point and publishes the new list.
    pub fn move_manual_point(&mut self, id: u64, position: DataPoint) -> PlotResult<()> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(PlotError::InvalidData(
                "manual point position must be finite".to_owned(),
            ));
        }
        let point = self
            .manual_points
            .iter_mut()
            .find(|point| point.id == id)
            .ok_or(PlotError::UnknownPoint(id))?;
        point.x = position.x;
        point.y = position.y;
        self.emit_manual_points_replaced();
        Ok(())
    }

    pub(super) fn emit_manual_points_replaced(&mut self) {
        let points = self.manual_points.clone();
        self.emit_event(PlotEvent::ManualPointsReplaced(points));
    }
}
