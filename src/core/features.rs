use serde::{Deserialize, Serialize};

use crate::core::evaluator::{Evaluator, evaluate_finite};
use crate::core::sampler::Sample;

/// Category of a derived point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Root,
    Extremum,
    Intersection,
}

/// Derived point recomputed every cycle; carries no identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub x: f64,
    pub y: f64,
    pub kind: FeatureKind,
}

impl Feature {
    #[must_use]
    pub fn new(x: f64, y: f64, kind: FeatureKind) -> Self {
        Self { x, y, kind }
    }
}

/// Zero crossing located on segment `index` at parameter `t` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Crossing {
    x: f64,
    index: usize,
    t: f64,
}

/// Sign-change scan over consecutive `(x, y)` pairs.
///
/// A pair whose left value is exactly zero yields its left x. A pair of
/// finite values with opposite signs yields the linearly interpolated zero.
fn scan_crossings(xs: &[f64], ys: &[f64]) -> Vec<Crossing> {
    let n = xs.len().min(ys.len());
    let mut out = Vec::new();
    for i in 1..n {
        let (ax, ay) = (xs[i - 1], ys[i - 1]);
        let (bx, by) = (xs[i], ys[i]);
        if ay == 0.0 {
            out.push(Crossing {
                x: ax,
                index: i - 1,
                t: 0.0,
            });
            continue;
        }
        if !ay.is_finite() || !by.is_finite() {
            continue;
        }
        if ay * by < 0.0 {
            let x = ax - ay * (bx - ax) / (by - ay);
            if x.is_finite() {
                out.push(Crossing {
                    x,
                    index: i - 1,
                    t: ay / (ay - by),
                });
            }
        }
    }
    out
}

fn split(series: &[Sample]) -> (Vec<f64>, Vec<f64>) {
    series.iter().map(|s| (s.x, s.y_raw)).unzip()
}

/// Roots of a raw sampled series, ascending in x.
#[must_use]
pub fn find_roots(series: &[Sample]) -> Vec<Feature> {
    let (xs, ys) = split(series);
    scan_crossings(&xs, &ys)
        .into_iter()
        .map(|c| Feature::new(c.x, 0.0, FeatureKind::Root))
        .collect()
}

/// Extrema from the strict sign changes of a derivative series.
///
/// Exact zeros of the derivative are not extrema on their own: a constant
/// layer has a derivative that is zero everywhere. A run of exact zeros
/// between finite values of opposite sign yields one extremum at the middle
/// of the run. Each x is mapped back through `f`; candidates with a
/// non-finite value are dropped.
#[must_use]
pub fn find_extrema(derivative: &[Sample], f: &dyn Evaluator) -> Vec<Feature> {
    let (xs, ys) = split(derivative);
    scan_sign_changes(&xs, &ys)
        .into_iter()
        .filter_map(|x| {
            let y = evaluate_finite(f, x);
            y.is_finite()
                .then(|| Feature::new(x, y, FeatureKind::Extremum))
        })
        .collect()
}

/// Sign changes between finite non-zero values, bridging exact-zero runs.
fn scan_sign_changes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut out = Vec::new();
    let mut last_signed: Option<usize> = None;
    for i in 0..n {
        let y = ys[i];
        if !y.is_finite() {
            last_signed = None;
            continue;
        }
        if y == 0.0 {
            continue;
        }
        if let Some(j) = last_signed {
            let (ax, ay) = (xs[j], ys[j]);
            if ay * y < 0.0 {
                let x = if j + 1 == i {
                    ax - ay * (xs[i] - ax) / (y - ay)
                } else {
                    0.5 * (xs[j + 1] + xs[i - 1])
                };
                if x.is_finite() {
                    out.push(x);
                }
            }
        }
        last_signed = Some(i);
    }
    out
}

/// Crossings of two series, reported as `(x, y_a)`.
///
/// `b` is resampled onto `a`'s grid first, so series of different density
/// or extent are compared at matching x positions.
#[must_use]
pub fn find_intersections(a: &[Sample], b: &[Sample]) -> Vec<Feature> {
    let (xs, ya) = split(a);
    let yb = if shares_grid(a, b) {
        b.iter().map(|s| s.y_raw).collect()
    } else {
        resample_onto(b, &xs)
    };
    let diff: Vec<f64> = ya.iter().zip(&yb).map(|(p, q)| p - q).collect();

    scan_crossings(&xs, &diff)
        .into_iter()
        .filter_map(|c| {
            let y = if c.t == 0.0 {
                ya[c.index]
            } else {
                ya[c.index] + c.t * (ya[c.index + 1] - ya[c.index])
            };
            y.is_finite()
                .then(|| Feature::new(c.x, y, FeatureKind::Intersection))
        })
        .collect()
}

fn shares_grid(a: &[Sample], b: &[Sample]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let span = match (a.first(), a.last()) {
        (Some(first), Some(last)) => (last.x - first.x).abs(),
        _ => return true,
    };
    let tol = span * 1e-12;
    a.iter().zip(b).all(|(p, q)| (p.x - q.x).abs() <= tol)
}

/// Linearly interpolates `series.y_raw` at each position of `grid`.
///
/// Positions outside the series extent, or next to a non-finite sample,
/// resolve to `NaN`. `series` must be ascending in x.
#[must_use]
pub fn resample_onto(series: &[Sample], grid: &[f64]) -> Vec<f64> {
    grid.iter()
        .map(|&x| {
            let upper = series.partition_point(|s| s.x < x);
            match (upper.checked_sub(1).map(|i| series[i]), series.get(upper)) {
                (_, Some(hit)) if hit.x == x => hit.y_raw,
                (Some(lo), Some(hi)) => {
                    let w = (x - lo.x) / (hi.x - lo.x);
                    lo.y_raw + w * (hi.y_raw - lo.y_raw)
                }
                _ => f64::NAN,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FeatureKind, find_extrema, find_intersections, find_roots, resample_onto};
    use crate::core::sampler::{Sample, sample_function};

    #[test]
    fn exact_zero_sample_is_reported_once() {
        let series = sample_function(&|x: f64| x, -1.0, 1.0, 5);
        let roots = find_roots(&series);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].x, 0.0);
        assert_eq!(roots[0].kind, FeatureKind::Root);
    }

    #[test]
    fn nan_gap_suppresses_false_root() {
        let series = sample_function(&|x: f64| 1.0 / x, -1.0, 1.0, 5);
        assert!(find_roots(&series).is_empty());
    }

    #[test]
    fn extrema_drop_non_finite_mapped_values() {
        let derivative = sample_function(&|x: f64| x, -1.0, 1.0, 4);
        let f = |x: f64| if x.abs() < 0.5 { f64::NAN } else { x * x };
        assert!(find_extrema(&derivative, &f).is_empty());
    }

    #[test]
    fn zero_derivative_yields_no_extrema() {
        let derivative = sample_function(&|_x: f64| 0.0, -5.0, 5.0, 330);
        assert!(find_extrema(&derivative, &|_x: f64| 0.5).is_empty());
    }

    #[test]
    fn zero_run_between_opposite_signs_is_one_extremum() {
        let derivative = vec![
            Sample::new(-2.0, -1.0),
            Sample::new(-1.0, 0.0),
            Sample::new(0.0, 0.0),
            Sample::new(1.0, 0.0),
            Sample::new(2.0, 1.0),
        ];
        let extrema = find_extrema(&derivative, &|x: f64| x * x);
        assert_eq!(extrema.len(), 1);
        assert_eq!(extrema[0].x, 0.0);
        assert_eq!(extrema[0].y, 0.0);
    }

    #[test]
    fn zero_run_without_sign_change_is_not_an_extremum() {
        let derivative = vec![
            Sample::new(-1.0, 1.0),
            Sample::new(0.0, 0.0),
            Sample::new(1.0, 1.0),
        ];
        assert!(find_extrema(&derivative, &|x: f64| x * x * x).is_empty());
    }

    #[test]
    fn intersections_resample_mismatched_grids() {
        let a = sample_function(&|x: f64| x, -2.0, 2.0, 41);
        let b = sample_function(&|_x: f64| 0.5, -2.0, 2.0, 7);
        let hits = find_intersections(&a, &b);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].x - 0.5).abs() <= 1e-9);
        assert!((hits[0].y - 0.5).abs() <= 1e-9);
    }

    #[test]
    fn resample_outside_extent_is_nan() {
        let series = vec![Sample::new(0.0, 0.0), Sample::new(1.0, 2.0)];
        let ys = resample_onto(&series, &[-0.5, 0.0, 0.25, 1.0, 1.5]);
        assert!(ys[0].is_nan());
        assert_eq!(ys[1], 0.0);
        assert!((ys[2] - 0.5).abs() <= 1e-12);
        assert_eq!(ys[3], 2.0);
        assert!(ys[4].is_nan());
    }
}
