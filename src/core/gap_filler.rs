use crate::core::sampler::Sample;
use crate::core::types::DataPoint;

/// Repairs non-finite values by forward-fill then backward-fill.
///
/// Each gap takes the nearest preceding finite value; leading gaps take the
/// first finite value. A sequence without any finite value becomes all
/// zeros so the rendering path always receives drawable input.
#[must_use]
pub fn fill_values(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();

    let mut last: Option<f64> = None;
    for value in &mut out {
        if value.is_finite() {
            last = Some(*value);
        } else if let Some(fill) = last {
            *value = fill;
        }
    }

    let mut next: Option<f64> = None;
    for value in out.iter_mut().rev() {
        if value.is_finite() {
            next = Some(*value);
        } else if let Some(fill) = next {
            *value = fill;
        }
    }

    for value in &mut out {
        if !value.is_finite() {
            *value = 0.0;
        }
    }
    out
}

/// Builds the drawable polyline for a series from its clamped values.
#[must_use]
pub fn fill_series(series: &[Sample]) -> Vec<DataPoint> {
    let ys: Vec<f64> = series.iter().map(|s| s.y_clamped).collect();
    series
        .iter()
        .zip(fill_values(&ys))
        .map(|(sample, y)| DataPoint::new(sample.x, y))
        .collect()
}
