use crate::core::sampler::Sample;
use crate::core::types::Interval;

const MIN_FINITE_VALUES: usize = 8;
const LOWER_PERCENTILE: f64 = 0.01;
const UPPER_PERCENTILE: f64 = 0.99;
const BLOW_UP_THRESHOLD: f64 = 1e12;
const CENTRAL_WINDOW: (f64, f64) = (0.10, 0.90);
const CENTRAL_MIN_VALUES: usize = 4;
const TIGHT_LOWER_PERCENTILE: f64 = 0.05;
const TIGHT_UPPER_PERCENTILE: f64 = 0.95;
const PAD_RATIO: f64 = 0.08;
const ZERO_SPAN_PAD: f64 = 1.0;

/// Derives a vertical viewing window from raw sampled values.
///
/// Uses the 1st/99th percentiles of every finite `y_raw`. When the result
/// looks like a blow-up (pole, overflow), it is recomputed from the central
/// 80% of the sorted values with 5th/95th percentiles. The window is padded
/// by 8% of its span, or by 1 when the span is zero.
///
/// Returns `fallback` with fewer than 8 finite values or when no finite
/// window can be formed. Deterministic in its input.
#[must_use]
pub fn robust_y_range<'a, I>(series: I, fallback: Interval) -> Interval
where
    I: IntoIterator<Item = &'a [Sample]>,
{
    let mut values: Vec<f64> = series
        .into_iter()
        .flat_map(|s| s.iter().map(|sample| sample.y_raw))
        .filter(|y| y.is_finite())
        .collect();
    robust_range_of_values(&mut values, fallback)
}

/// Value-level form of [`robust_y_range`]. Sorts `values` in place.
#[must_use]
pub fn robust_range_of_values(values: &mut Vec<f64>, fallback: Interval) -> Interval {
    values.retain(|y| y.is_finite());
    if values.len() < MIN_FINITE_VALUES {
        return fallback;
    }
    values.sort_by(f64::total_cmp);

    let mut lo = percentile(values, LOWER_PERCENTILE);
    let mut hi = percentile(values, UPPER_PERCENTILE);
    if !lo.is_finite() || !hi.is_finite() {
        return fallback;
    }

    if indicates_blow_up(lo, hi) {
        let len = values.len() as f64;
        let start = (len * CENTRAL_WINDOW.0).floor() as usize;
        let end = ((len * CENTRAL_WINDOW.1).ceil() as usize).min(values.len());
        let central = &values[start..end];
        if central.len() < CENTRAL_MIN_VALUES {
            return fallback;
        }
        lo = percentile(central, TIGHT_LOWER_PERCENTILE);
        hi = percentile(central, TIGHT_UPPER_PERCENTILE);
    }

    let span = hi - lo;
    let pad = if span > 0.0 {
        PAD_RATIO * span
    } else {
        ZERO_SPAN_PAD
    };
    Interval::new(lo - pad, hi + pad).unwrap_or(fallback)
}

fn indicates_blow_up(lo: f64, hi: f64) -> bool {
    let span = hi - lo;
    let ratio = hi.abs() / lo.abs().max(1e-12);
    !ratio.is_finite() || !span.is_finite() || ratio > BLOW_UP_THRESHOLD || span > BLOW_UP_THRESHOLD
}

/// Linearly interpolated percentile of an ascending slice.
fn percentile(sorted: &[f64], t: f64) -> f64 {
    let idx = (sorted.len() - 1) as f64 * t;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let w = idx - lo as f64;
    sorted[lo] * (1.0 - w) + sorted[hi] * w
}

#[cfg(test)]
mod tests {
    use super::{percentile, robust_range_of_values};
    use crate::core::types::Interval;

    fn fallback() -> Interval {
        Interval::new(-2.0, 2.0).expect("fallback")
    }

    #[test]
    fn percentile_interpolates_between_neighbours() {
        let sorted = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&sorted, 0.5), 20.0);
        assert!((percentile(&sorted, 0.1) - 4.0).abs() <= 1e-12);
    }

    #[test]
    fn too_few_values_use_fallback() {
        let mut values = vec![1.0, 2.0, 3.0, f64::NAN, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(robust_range_of_values(&mut values, fallback()), fallback());
    }

    #[test]
    fn constant_values_get_unit_padding() {
        let mut values = vec![3.0; 16];
        let range = robust_range_of_values(&mut values, fallback());
        assert_eq!(range, Interval::new(2.0, 4.0).expect("range"));
    }

    #[test]
    fn sparse_outliers_fall_outside_percentiles() {
        let mut values: Vec<f64> = (0..200).map(|i| i as f64 / 100.0 - 1.0).collect();
        values.push(1e15);
        values.push(-8e14);
        let range = robust_range_of_values(&mut values, fallback());
        assert!(range.max < 1.5);
        assert!(range.min > -1.5);
    }

    #[test]
    fn dense_outliers_trigger_central_window_recompute() {
        let mut values: Vec<f64> = (0..90).map(|i| i as f64 / 45.0 - 1.0).collect();
        values.extend([1e13; 5]);
        values.extend([-1e13; 5]);
        let range = robust_range_of_values(&mut values, fallback());
        assert!(range.max < 1.5);
        assert!(range.min > -1.5);
        assert!(range.min < 0.0 && range.max > 0.0);
    }
}
