use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::evaluator::{Evaluator, SharedEvaluator, evaluate_finite};

pub const MIN_TAYLOR_DEGREE: u32 = 1;
pub const MAX_TAYLOR_DEGREE: u32 = 24;
/// Coefficients at or below this magnitude are not stored.
pub const NEGLIGIBLE_COEFFICIENT: f64 = 1e-10;
const SINE_CENTER_TOLERANCE: f64 = 1e-9;
const MAX_SCANNED_ORDER: u32 = 80;

/// Function recognised by the host's expression layer as a closed form the
/// engine can expand without numerical differentiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosedForm {
    /// `sin(x)`
    Sine,
}

/// Stable identity of a plotted expression.
///
/// `source` is whatever text the host uses to tell expressions apart. An
/// empty source marks a layer with nothing to plot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpressionId {
    source: String,
    closed_form: Option<ClosedForm>,
}

impl ExpressionId {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            closed_form: None,
        }
    }

    #[must_use]
    pub fn with_closed_form(mut self, closed_form: ClosedForm) -> Self {
        self.closed_form = Some(closed_form);
        self
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn closed_form(&self) -> Option<ClosedForm> {
        self.closed_form
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// Non-negligible term `coefficient · (x - center)^power`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaylorTerm {
    pub power: u32,
    pub coefficient: f64,
}

/// Sparse truncated power series about `center`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaylorPolynomial {
    center: f64,
    terms: Vec<TaylorTerm>,
}

impl TaylorPolynomial {
    #[must_use]
    pub fn new(center: f64, terms: Vec<TaylorTerm>) -> Self {
        Self { center, terms }
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        self.center
    }

    #[must_use]
    pub fn terms(&self) -> &[TaylorTerm] {
        &self.terms
    }

    /// `true` when no term survived; the polynomial evaluates to `0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Plain power sum over the kept terms.
    #[must_use]
    pub fn value_at(&self, x: f64) -> f64 {
        let dx = x - self.center;
        self.terms
            .iter()
            .map(|t| t.coefficient * dx.powi(t.power as i32))
            .sum()
    }
}

impl Evaluator for TaylorPolynomial {
    fn evaluate(&self, x: f64) -> Option<f64> {
        Some(self.value_at(x))
    }
}

/// Cache key: expression identity, expansion center and clamped degree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaylorKey {
    pub expression: ExpressionId,
    pub center: OrderedFloat<f64>,
    pub degree: u32,
}

impl TaylorKey {
    #[must_use]
    pub fn new(expression: ExpressionId, center: f64, degree_request: u32) -> Self {
        Self {
            expression,
            center: OrderedFloat(center),
            degree: clamp_degree(degree_request),
        }
    }
}

#[must_use]
pub fn clamp_degree(degree_request: u32) -> u32 {
    degree_request.clamp(MIN_TAYLOR_DEGREE, MAX_TAYLOR_DEGREE)
}

/// Caller-owned coefficient cache.
///
/// Entries live until [`TaylorCache::retain_referenced`] finds them
/// unreferenced.
#[derive(Debug, Default)]
pub struct TaylorCache {
    entries: IndexMap<TaylorKey, Arc<TaylorPolynomial>>,
}

impl TaylorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &TaylorKey) -> Option<Arc<TaylorPolynomial>> {
        self.entries.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &TaylorKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: TaylorKey, polynomial: Arc<TaylorPolynomial>) {
        self.entries.insert(key, polynomial);
    }

    /// Drops every entry whose key is not in `referenced`.
    ///
    /// Returns the number of evicted entries.
    pub fn retain_referenced<'a, I>(&mut self, referenced: I) -> usize
    where
        I: IntoIterator<Item = &'a TaylorKey>,
    {
        let keep: Vec<&TaylorKey> = referenced.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|key, _| keep.contains(&key));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Returns the Taylor polynomial of an expression about `center`.
///
/// `factory` is only invoked on a cache miss. Expressions tagged
/// [`ClosedForm::Sine`] expanded at the origin use exact Maclaurin
/// coefficients; everything else goes through [`numeric_coefficients`].
pub fn taylor_from_expr<F>(
    cache: &mut TaylorCache,
    expression: &ExpressionId,
    factory: F,
    center: f64,
    degree_request: u32,
) -> Arc<TaylorPolynomial>
where
    F: FnOnce() -> SharedEvaluator,
{
    let key = TaylorKey::new(expression.clone(), center, degree_request);
    if let Some(hit) = cache.get(&key) {
        return hit;
    }

    let terms = match expression.closed_form() {
        Some(ClosedForm::Sine) if center.abs() <= SINE_CENTER_TOLERANCE => {
            sine_maclaurin_terms(key.degree)
        }
        _ => {
            let f = factory();
            numeric_coefficients(f.as_ref(), center, key.degree)
        }
    };
    trace!(
        expression = expression.source(),
        center,
        degree = key.degree,
        kept = terms.len(),
        "built taylor polynomial"
    );

    let polynomial = Arc::new(TaylorPolynomial::new(center, terms));
    cache.insert(key, Arc::clone(&polynomial));
    polynomial
}

/// First `count` odd-power terms of `sin(x)` at the origin.
#[must_use]
pub fn sine_maclaurin_terms(count: u32) -> Vec<TaylorTerm> {
    (0..count)
        .map(|n| {
            let power = 2 * n + 1;
            let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
            TaylorTerm {
                power,
                coefficient: sign / factorial(power),
            }
        })
        .collect()
}

/// Sparse coefficients from numerical derivatives at `center`.
///
/// Scans orders `k = 0, 1, ...` until `term_count` non-negligible terms
/// are kept or `k` exceeds `min(2·term_count + 16, 80)`.
#[must_use]
pub fn numeric_coefficients(f: &dyn Evaluator, center: f64, term_count: u32) -> Vec<TaylorTerm> {
    let h = derivative_step(center);
    let max_order = (2 * term_count + 16).min(MAX_SCANNED_ORDER);
    let mut terms = Vec::new();
    let mut k = 0;
    while terms.len() < term_count as usize && k <= max_order {
        let dk = nth_central_derivative(f, center, k, h);
        if dk.is_finite() {
            let coefficient = dk / factorial(k);
            if coefficient.abs() > NEGLIGIBLE_COEFFICIENT {
                terms.push(TaylorTerm {
                    power: k,
                    coefficient,
                });
            }
        }
        k += 1;
    }
    terms
}

/// `min(1e-2, 1e-3 · max(1, |a|))`
#[must_use]
pub fn derivative_step(center: f64) -> f64 {
    (1e-3 * center.abs().max(1.0)).min(1e-2)
}

/// `k`-fold central difference `(f(x+h) - f(x-h)) / 2h` at `a`.
///
/// Expanded into its binomial form so only `k + 1` evaluations are made.
/// Any non-finite evaluation makes the result `NaN`.
#[must_use]
pub fn nth_central_derivative(f: &dyn Evaluator, a: f64, k: u32, h: f64) -> f64 {
    if k == 0 {
        return evaluate_finite(f, a);
    }
    let mut binomial = 1.0;
    let mut sum = 0.0;
    for j in 0..=k {
        if j > 0 {
            binomial = binomial * f64::from(k - j + 1) / f64::from(j);
        }
        let offset = f64::from(k) - 2.0 * f64::from(j);
        let value = evaluate_finite(f, a + offset * h);
        if !value.is_finite() {
            return f64::NAN;
        }
        let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign * binomial * value;
    }
    let d = sum / (2.0 * h).powi(k as i32);
    if d.is_finite() { d } else { f64::NAN }
}

fn factorial(n: u32) -> f64 {
    (2..=n).map(f64::from).product()
}
