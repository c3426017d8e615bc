use serde::{Deserialize, Serialize};

use crate::core::scale::{AxisDirection, LinearScale};
use crate::core::types::{DataPoint, Interval, PixelPoint, PlotArea};
use crate::error::{PlotError, PlotResult};

/// Lower clamp for data-units-per-pixel.
pub const MIN_UNITS_PER_PIXEL: f64 = 1e-12;
/// Upper clamp for data-units-per-pixel.
pub const MAX_UNITS_PER_PIXEL: f64 = 1e12;

/// Axis a constrained drag is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisLock {
    X,
    Y,
}

impl AxisLock {
    /// Picks the dominant axis of a pixel delta. Ties lock to X.
    #[must_use]
    pub fn decide(dx_px: f64, dy_px: f64) -> Self {
        if dx_px.abs() >= dy_px.abs() {
            Self::X
        } else {
            Self::Y
        }
    }

    /// Zeroes the component of a delta that is orthogonal to the lock.
    #[must_use]
    pub fn apply(self, dx: f64, dy: f64) -> (f64, f64) {
        match self {
            Self::X => (dx, 0.0),
            Self::Y => (0.0, dy),
        }
    }
}

/// Visible data rectangle (Domain × Range) and its pixel mapping.
///
/// The x and y units-per-pixel factors are independent. Every mutation
/// leaves both intervals finite with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    area: PlotArea,
    domain: Interval,
    range: Interval,
}

impl Viewport {
    pub fn new(area: PlotArea, domain: Interval, range: Interval) -> PlotResult<Self> {
        Ok(Self {
            area: area.validate()?,
            domain,
            range,
        })
    }

    /// Builds a viewport whose range is centred on `y = 0` and shares the
    /// domain's units-per-pixel.
    pub fn matched(area: PlotArea, domain: Interval) -> PlotResult<Self> {
        let area = area.validate()?;
        let half = domain.span() / area.width * area.height / 2.0;
        let range = Interval::new(-half, half)?;
        Ok(Self {
            area,
            domain,
            range,
        })
    }

    #[must_use]
    pub fn area(&self) -> PlotArea {
        self.area
    }

    #[must_use]
    pub fn domain(&self) -> Interval {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> Interval {
        self.range
    }

    /// Domain units per pixel.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.domain.span() / self.area.width
    }

    /// Range units per pixel.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.range.span() / self.area.height
    }

    #[must_use]
    pub fn data_to_pixel(&self, point: DataPoint) -> PixelPoint {
        PixelPoint::new(
            self.x_scale().value_to_pixel(point.x),
            self.y_scale().value_to_pixel(point.y),
        )
    }

    #[must_use]
    pub fn pixel_to_data(&self, pixel: PixelPoint) -> DataPoint {
        DataPoint::new(
            self.x_scale().pixel_to_value(pixel.x),
            self.y_scale().pixel_to_value(pixel.y),
        )
    }

    pub fn set_area(&mut self, area: PlotArea) -> PlotResult<()> {
        self.area = area.validate()?;
        Ok(())
    }

    pub fn set_domain(&mut self, domain: Interval) {
        self.domain = domain;
    }

    pub fn set_range(&mut self, range: Interval) {
        self.range = range;
    }

    /// Drags the visible rectangle by a pixel delta.
    ///
    /// Content follows the pointer: moving right reveals smaller x, moving
    /// down reveals larger y.
    pub fn pan_by(&mut self, dx_px: f64, dy_px: f64) -> PlotResult<()> {
        if !dx_px.is_finite() || !dy_px.is_finite() {
            return Err(PlotError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        let domain = shifted_interval(self.domain, -dx_px * self.scale_x())?;
        let range = shifted_interval(self.range, dy_px * self.scale_y())?;
        self.domain = domain;
        self.range = range;
        Ok(())
    }

    /// Multiplies both units-per-pixel factors by `factor` while keeping the
    /// data coordinate under `anchor` fixed.
    ///
    /// `factor < 1.0` zooms in, `factor > 1.0` zooms out.
    pub fn zoom_around(&mut self, factor: f64, anchor: PixelPoint) -> PlotResult<()> {
        *self = self.zoomed(factor, anchor)?;
        Ok(())
    }

    /// Non-mutating form of [`Viewport::zoom_around`].
    pub fn zoomed(&self, factor: f64, anchor: PixelPoint) -> PlotResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PlotError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !anchor.x.is_finite() || !anchor.y.is_finite() {
            return Err(PlotError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }

        let anchor_data = self.pixel_to_data(anchor);
        let sx = clamp_units_per_pixel(self.scale_x() * factor);
        let sy = clamp_units_per_pixel(self.scale_y() * factor);

        let min_x = anchor_data.x - (anchor.x - self.area.left) * sx;
        let max_x = min_x + self.area.width * sx;
        let max_y = anchor_data.y + (anchor.y - self.area.top) * sy;
        let min_y = max_y - self.area.height * sy;

        Ok(Self {
            area: self.area,
            domain: Interval::new(min_x, max_x)?,
            range: Interval::new(min_y, max_y)?,
        })
    }

    /// Scales both spans about their midpoints.
    pub fn zoom_about_center(&mut self, scale: f64) -> PlotResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PlotError::InvalidData(
                "center zoom scale must be finite and > 0".to_owned(),
            ));
        }

        let domain = scaled_about_midpoint(self.domain, scale, self.area.width)?;
        let range = scaled_about_midpoint(self.range, scale, self.area.height)?;
        self.domain = domain;
        self.range = range;
        Ok(())
    }

    /// Recentres on the origin, keeping the x scale and matching y to it.
    pub fn center(&mut self) -> PlotResult<()> {
        let s = self.scale_x();
        let half_x = s * self.area.width / 2.0;
        let half_y = s * self.area.height / 2.0;
        self.domain = Interval::new(-half_x, half_x)?;
        self.range = Interval::new(-half_y, half_y)?;
        Ok(())
    }

    fn x_scale(&self) -> LinearScale {
        LinearScale::new(
            self.domain,
            self.area.left,
            self.area.width,
            AxisDirection::Forward,
        )
    }

    fn y_scale(&self) -> LinearScale {
        LinearScale::new(
            self.range,
            self.area.top,
            self.area.height,
            AxisDirection::Inverted,
        )
    }
}

#[must_use]
pub fn clamp_units_per_pixel(value: f64) -> f64 {
    value.clamp(MIN_UNITS_PER_PIXEL, MAX_UNITS_PER_PIXEL)
}

fn shifted_interval(interval: Interval, delta: f64) -> PlotResult<Interval> {
    let shifted = interval.shifted(delta);
    Interval::new(shifted.min, shifted.max)
}

fn scaled_about_midpoint(interval: Interval, scale: f64, extent_px: f64) -> PlotResult<Interval> {
    let units = clamp_units_per_pixel(interval.span() * scale / extent_px);
    let half = units * extent_px / 2.0;
    let mid = interval.midpoint();
    Interval::new(mid - half, mid + half)
}
