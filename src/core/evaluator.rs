use std::fmt;
use std::sync::Arc;

/// Opaque scalar function supplied by the host's expression layer.
///
/// `None` signals an evaluation failure. The engine never learns why; it
/// only substitutes `NaN` at the call site.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, x: f64) -> Option<f64>;
}

impl<F> Evaluator for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64) -> Option<f64> {
        Some(self(x))
    }
}

/// Adapter for closures that report failure through `Option`.
pub struct Fallible<F>(pub F);

impl<F> Evaluator for Fallible<F>
where
    F: Fn(f64) -> Option<f64> + Send + Sync,
{
    fn evaluate(&self, x: f64) -> Option<f64> {
        (self.0)(x)
    }
}

impl<F> fmt::Debug for Fallible<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fallible(..)")
    }
}

pub type SharedEvaluator = Arc<dyn Evaluator>;

/// Evaluates `f` at `x`, mapping failure and non-finite output to `NaN`.
#[inline]
#[must_use]
pub fn evaluate_finite(f: &dyn Evaluator, x: f64) -> f64 {
    match f.evaluate(x) {
        Some(y) if y.is_finite() => y,
        _ => f64::NAN,
    }
}

/// Numeric first derivative used when no symbolic derivative is available.
///
/// Central difference with a step of `max(1e-6, 1e-6·|x| + 1e-6)`.
pub struct CentralDifference {
    f: SharedEvaluator,
}

impl CentralDifference {
    #[must_use]
    pub fn new(f: SharedEvaluator) -> Self {
        Self { f }
    }
}

impl Evaluator for CentralDifference {
    fn evaluate(&self, x: f64) -> Option<f64> {
        let h = (x.abs() * 1e-6 + 1e-6).max(1e-6);
        let below = evaluate_finite(self.f.as_ref(), x - h);
        let above = evaluate_finite(self.f.as_ref(), x + h);
        let d = (above - below) / (2.0 * h);
        d.is_finite().then_some(d)
    }
}

/// Three-point second difference `(f(x+h) - 2f(x) + f(x-h)) / h²`.
pub struct SecondDifference {
    f: SharedEvaluator,
    h: f64,
}

impl SecondDifference {
    #[must_use]
    pub fn new(f: SharedEvaluator, h: f64) -> Self {
        Self { f, h }
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.h
    }
}

impl Evaluator for SecondDifference {
    fn evaluate(&self, x: f64) -> Option<f64> {
        let f = self.f.as_ref();
        let below = evaluate_finite(f, x - self.h);
        let mid = evaluate_finite(f, x);
        let above = evaluate_finite(f, x + self.h);
        let d = (above - 2.0 * mid + below) / (self.h * self.h);
        d.is_finite().then_some(d)
    }
}
