use serde::{Deserialize, Serialize};

use crate::core::evaluator::{Evaluator, evaluate_finite};
use crate::core::types::Interval;

/// Finite drawing bound applied to `y_clamped`.
pub const DRAW_Y_BOUND: f64 = 1e4;

/// One evaluated grid position.
///
/// `y_raw` is the evaluator output (`NaN` on failure) and is what feature
/// detection reads. `y_clamped` is bounded to `±DRAW_Y_BOUND` for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y_raw: f64,
    pub y_clamped: f64,
}

impl Sample {
    #[must_use]
    pub fn new(x: f64, y_raw: f64) -> Self {
        let y_clamped = if y_raw.is_finite() {
            y_raw.clamp(-DRAW_Y_BOUND, DRAW_Y_BOUND)
        } else {
            f64::NAN
        };
        Self {
            x,
            y_raw,
            y_clamped,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.y_raw.is_finite()
    }
}

/// Sampling density policy derived from the plot width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleDensity {
    pub min_primary: usize,
    pub max_primary: usize,
    pub derivative_ratio: f64,
    pub min_derivative: usize,
}

impl Default for SampleDensity {
    fn default() -> Self {
        Self {
            min_primary: 500,
            max_primary: 2000,
            derivative_ratio: 0.55,
            min_derivative: 200,
        }
    }
}

impl SampleDensity {
    /// Primary curve density `N = clamp(pixel_width, 500, 2000)`.
    #[must_use]
    pub fn primary(self, pixel_width: f64) -> usize {
        let width = if pixel_width.is_finite() && pixel_width > 0.0 {
            pixel_width.floor() as usize
        } else {
            0
        };
        width.clamp(self.min_primary, self.max_primary)
    }

    /// Derivative curve density `ND = max(200, floor(N * 0.55))`.
    #[must_use]
    pub fn derivative(self, primary: usize) -> usize {
        let scaled = (primary as f64 * self.derivative_ratio).floor() as usize;
        scaled.max(self.min_derivative)
    }
}

/// Evaluates `f` at `n` uniformly spaced positions over `[min, max]`.
///
/// Failures and non-finite values are recorded as `NaN` without retry.
/// For `n >= 2` the first sample sits on `min` and the last on `max`.
#[must_use]
pub fn sample_function(f: &dyn Evaluator, min: f64, max: f64, n: usize) -> Vec<Sample> {
    let dx = (max - min) / (n.max(2) - 1) as f64;
    (0..n)
        .map(|i| {
            let x = min + i as f64 * dx;
            Sample::new(x, evaluate_finite(f, x))
        })
        .collect()
}

/// Convenience form of [`sample_function`] over an interval.
#[must_use]
pub fn sample_interval(f: &dyn Evaluator, domain: Interval, n: usize) -> Vec<Sample> {
    sample_function(f, domain.min, domain.max, n)
}

/// Step used by the numeric second derivative: `domain_span / ND`.
#[must_use]
pub fn second_derivative_step(domain: Interval, derivative_samples: usize) -> f64 {
    domain.span().max(1e-9) / derivative_samples.max(1) as f64
}

/// Returns `true` when no sample carries a finite raw value.
#[must_use]
pub fn is_wholly_non_finite(series: &[Sample]) -> bool {
    !series.iter().any(Sample::is_finite)
}
