use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::sampler::SampleDensity;
use crate::core::types::{Interval, PlotArea};
use crate::error::{PlotError, PlotResult};
use crate::interaction::WheelZoomConfig;

/// Which derived features are computed and offered for hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggles {
    pub roots: bool,
    pub extrema: bool,
    pub intersections: bool,
    /// Report `(0, f(0))` when hovering the y axis.
    pub y_axis_hover: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            roots: true,
            extrema: true,
            intersections: true,
            y_axis_hover: true,
        }
    }
}

/// Taylor overlay sampling and debounce tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaylorOverlayConfig {
    pub samples: usize,
    pub debounce_ms: u64,
}

impl Default for TaylorOverlayConfig {
    fn default() -> Self {
        Self {
            samples: 240,
            debounce_ms: 60,
        }
    }
}

impl TaylorOverlayConfig {
    #[must_use]
    pub fn debounce(self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist and reload plot setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotEngineConfig {
    pub area: PlotArea,
    pub domain: Interval,
    /// Explicit initial range. `None` matches the x scale, centred on 0.
    #[serde(default)]
    pub range: Option<Interval>,
    #[serde(default = "default_fallback_range")]
    pub fallback_range: Interval,
    #[serde(default)]
    pub features: FeatureToggles,
    #[serde(default)]
    pub sampling: SampleDensity,
    #[serde(default)]
    pub taylor: TaylorOverlayConfig,
    #[serde(default)]
    pub wheel_zoom: WheelZoomConfig,
}

impl PlotEngineConfig {
    /// Creates a config over `domain` with defaults everywhere else.
    #[must_use]
    pub fn new(area: PlotArea, domain: Interval) -> Self {
        Self {
            area,
            domain,
            range: None,
            fallback_range: default_fallback_range(),
            features: FeatureToggles::default(),
            sampling: SampleDensity::default(),
            taylor: TaylorOverlayConfig::default(),
            wheel_zoom: WheelZoomConfig::default(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: Interval) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn with_fallback_range(mut self, fallback_range: Interval) -> Self {
        self.fallback_range = fallback_range;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: FeatureToggles) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_sampling(mut self, sampling: SampleDensity) -> Self {
        self.sampling = sampling;
        self
    }

    #[must_use]
    pub fn with_taylor(mut self, taylor: TaylorOverlayConfig) -> Self {
        self.taylor = taylor;
        self
    }

    #[must_use]
    pub fn with_wheel_zoom(mut self, wheel_zoom: WheelZoomConfig) -> Self {
        self.wheel_zoom = wheel_zoom;
        self
    }

    /// Rejects values the engine cannot start from.
    ///
    /// Intervals are re-checked because deserialized values bypass
    /// [`Interval::new`].
    pub fn validate(self) -> PlotResult<Self> {
        self.area.validate()?;
        Interval::new(self.domain.min, self.domain.max)?;
        Interval::new(self.fallback_range.min, self.fallback_range.max)?;
        if let Some(range) = self.range {
            Interval::new(range.min, range.max)?;
        }

        let sampling = self.sampling;
        if sampling.min_primary < 2 || sampling.min_primary > sampling.max_primary {
            return Err(PlotError::InvalidData(
                "sampling bounds must satisfy 2 <= min_primary <= max_primary".to_owned(),
            ));
        }
        if !sampling.derivative_ratio.is_finite()
            || sampling.derivative_ratio <= 0.0
            || sampling.min_derivative < 2
        {
            return Err(PlotError::InvalidData(
                "derivative sampling must have a finite ratio > 0 and at least 2 samples"
                    .to_owned(),
            ));
        }
        if self.taylor.samples < 2 {
            return Err(PlotError::InvalidData(
                "taylor overlay needs at least 2 samples".to_owned(),
            ));
        }
        let wheel = self.wheel_zoom;
        if !wheel.rate.is_finite()
            || wheel.rate < 0.0
            || !wheel.max_step.is_finite()
            || wheel.max_step < 0.0
        {
            return Err(PlotError::InvalidData(
                "wheel zoom rate and max step must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> PlotResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| PlotError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_fallback_range() -> Interval {
    Interval {
        min: -2.0,
        max: 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::PlotEngineConfig;
    use crate::core::types::{Interval, PlotArea};

    fn config() -> PlotEngineConfig {
        PlotEngineConfig::new(
            PlotArea::sized(800.0, 600.0),
            Interval::new(-5.0, 5.0).expect("domain"),
        )
    }

    #[test]
    fn json_round_trip_keeps_values() {
        let original = config().with_range(Interval::new(-1.0, 3.0).expect("range"));
        let json = original.to_json_pretty().expect("serialize");
        let parsed = PlotEngineConfig::from_json_str(&json).expect("parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{
            "area": { "left": 0.0, "top": 0.0, "width": 400.0, "height": 300.0 },
            "domain": { "min": -1.0, "max": 1.0 }
        }"#;
        let parsed = PlotEngineConfig::from_json_str(json).expect("parse");
        assert_eq!(parsed.fallback_range, Interval::new(-2.0, 2.0).expect("fallback"));
        assert_eq!(parsed.taylor.samples, 240);
        assert_eq!(parsed.sampling.min_primary, 500);
        assert!(parsed.range.is_none());
    }

    #[test]
    fn inverted_domain_from_json_is_rejected() {
        let json = r#"{
            "area": { "left": 0.0, "top": 0.0, "width": 400.0, "height": 300.0 },
            "domain": { "min": 1.0, "max": -1.0 }
        }"#;
        let parsed = PlotEngineConfig::from_json_str(json).expect("parse");
        assert!(parsed.validate().is_err());
    }
}
