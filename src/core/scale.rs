use crate::core::types::Interval;

/// Orientation of an axis in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    /// Pixel coordinate grows with the data value (x-axis).
    Forward,
    /// Pixel coordinate shrinks as the data value grows (y-axis).
    Inverted,
}

/// Affine mapping between one data axis and one pixel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Interval,
    pixel_origin: f64,
    pixel_extent: f64,
    direction: AxisDirection,
}

impl LinearScale {
    /// Builds a scale over a pixel extent the caller already validated
    /// (see [`PlotArea::validate`](crate::core::types::PlotArea::validate)).
    #[must_use]
    pub(crate) fn new(
        domain: Interval,
        pixel_origin: f64,
        pixel_extent: f64,
        direction: AxisDirection,
    ) -> Self {
        Self {
            domain,
            pixel_origin,
            pixel_extent,
            direction,
        }
    }

    #[must_use]
    pub fn domain(self) -> Interval {
        self.domain
    }

    /// Data units per pixel.
    #[must_use]
    pub fn units_per_pixel(self) -> f64 {
        self.domain.span() / self.pixel_extent
    }

    #[must_use]
    pub fn value_to_pixel(self, value: f64) -> f64 {
        let offset = match self.direction {
            AxisDirection::Forward => value - self.domain.min,
            AxisDirection::Inverted => self.domain.max - value,
        };
        self.pixel_origin + offset / self.units_per_pixel()
    }

    #[must_use]
    pub fn pixel_to_value(self, pixel: f64) -> f64 {
        let offset = (pixel - self.pixel_origin) * self.units_per_pixel();
        match self.direction {
            AxisDirection::Forward => self.domain.min + offset,
            AxisDirection::Inverted => self.domain.max - offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisDirection, LinearScale};
    use crate::core::types::Interval;

    #[test]
    fn forward_scale_maps_bounds_to_pixel_edges() {
        let domain = Interval::new(-5.0, 5.0).expect("domain");
        let scale = LinearScale::new(domain, 10.0, 100.0, AxisDirection::Forward);
        assert!((scale.value_to_pixel(-5.0) - 10.0).abs() <= 1e-12);
        assert!((scale.value_to_pixel(5.0) - 110.0).abs() <= 1e-12);
        assert!((scale.pixel_to_value(60.0)).abs() <= 1e-12);
    }

    #[test]
    fn inverted_scale_puts_max_at_origin() {
        let range = Interval::new(0.0, 4.0).expect("range");
        let scale = LinearScale::new(range, 0.0, 200.0, AxisDirection::Inverted);
        assert!((scale.value_to_pixel(4.0)).abs() <= 1e-12);
        assert!((scale.value_to_pixel(0.0) - 200.0).abs() <= 1e-12);
        assert!((scale.pixel_to_value(50.0) - 3.0).abs() <= 1e-12);
    }
}
