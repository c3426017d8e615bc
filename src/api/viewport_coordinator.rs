use tracing::debug;

use crate::core::types::{DataPoint, Interval, PixelPoint, PlotArea};
use crate::core::viewport::Viewport;
use crate::error::PlotResult;

use super::{PlotEngine, PlotEvent};

/// Keyboard zoom steps.
pub const ZOOM_IN_SCALE: f64 = 0.9;
pub const ZOOM_OUT_SCALE: f64 = 1.1;

impl PlotEngine {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn domain(&self) -> Interval {
        self.viewport.domain()
    }

    #[must_use]
    pub fn range(&self) -> Interval {
        self.viewport.range()
    }

    #[must_use]
    pub fn data_to_pixel(&self, point: DataPoint) -> PixelPoint {
        self.viewport.data_to_pixel(point)
    }

    #[must_use]
    pub fn pixel_to_data(&self, pixel: PixelPoint) -> DataPoint {
        self.viewport.pixel_to_data(pixel)
    }

    pub fn pan_by(&mut self, dx_px: f64, dy_px: f64) -> PlotResult<()> {
        self.viewport.pan_by(dx_px, dy_px)?;
        self.on_viewport_changed();
        Ok(())
    }

    /// Zooms keeping the data point under `anchor` fixed.
    pub fn zoom_around(&mut self, factor: f64, anchor: PixelPoint) -> PlotResult<()> {
        self.viewport.zoom_around(factor, anchor)?;
        self.on_viewport_changed();
        Ok(())
    }

    pub fn zoom_about_center(&mut self, scale: f64) -> PlotResult<()> {
        self.viewport.zoom_about_center(scale)?;
        self.on_viewport_changed();
        Ok(())
    }

    pub fn zoom_in(&mut self) -> PlotResult<()> {
        self.zoom_about_center(ZOOM_IN_SCALE)
    }

    pub fn zoom_out(&mut self) -> PlotResult<()> {
        self.zoom_about_center(ZOOM_OUT_SCALE)
    }

    /// Recentres on the origin with matched axes.
    pub fn center(&mut self) -> PlotResult<()> {
        self.viewport.center()?;
        self.on_viewport_changed();
        Ok(())
    }

    pub fn set_domain(&mut self, domain: Interval) -> PlotResult<()> {
        let domain = Interval::new(domain.min, domain.max)?;
        self.viewport.set_domain(domain);
        self.on_viewport_changed();
        Ok(())
    }

    pub fn set_range(&mut self, range: Interval) -> PlotResult<()> {
        let range = Interval::new(range.min, range.max)?;
        self.viewport.set_range(range);
        self.on_viewport_changed();
        Ok(())
    }

    /// Applies the robust vertical window of the current frame.
    pub fn fit_range_to_data(&mut self) -> PlotResult<()> {
        let suggested = self.frame.suggested_range;
        debug!(
            min = suggested.min,
            max = suggested.max,
            "fitting range to sampled data"
        );
        self.set_range(suggested)
    }

    /// Resizes the plot area. Domain and range are kept, so the
    /// units-per-pixel factors change.
    pub fn set_plot_area(&mut self, area: PlotArea) -> PlotResult<()> {
        self.viewport.set_area(area)?;
        self.config.area = area;
        self.on_viewport_changed();
        Ok(())
    }

    /// Rebuilds the frame, reschedules the Taylor overlay and notifies
    /// observers.
    pub(super) fn on_viewport_changed(&mut self) {
        self.rebuild_frame();
        self.reschedule_taylor();
        let (domain, range) = (self.viewport.domain(), self.viewport.range());
        self.emit_event(PlotEvent::ViewportChanged { domain, range });
    }
}
