use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Pixel rectangle occupied by the plot inside its host surface.
///
/// `left`/`top` are the inner padding offsets; `width`/`height` the
/// drawable extent. Pixel Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Plot area anchored at the pixel origin.
    #[must_use]
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn validate(self) -> PlotResult<Self> {
        if !self.is_valid() {
            return Err(PlotError::InvalidPlotArea {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    /// Returns `true` when the pixel lies inside the area (boundary included).
    #[must_use]
    pub fn contains(self, pixel: PixelPoint) -> bool {
        pixel.x >= self.left
            && pixel.x <= self.left + self.width
            && pixel.y >= self.top
            && pixel.y <= self.top + self.height
    }
}

/// Closed axis bounds `[min, max]` with `min < max`, both finite.
///
/// Used for both the x-axis Domain and the y-axis Range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> PlotResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PlotError::InvalidData(
                "interval bounds must be finite".to_owned(),
            ));
        }
        if min >= max {
            return Err(PlotError::InvalidData(
                "interval min must be < max".to_owned(),
            ));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[must_use]
    pub fn shifted(self, delta: f64) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Data-space point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel-space point relative to the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// User-placed draggable marker. Identity is owned by the external store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl ManualPoint {
    #[must_use]
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}
