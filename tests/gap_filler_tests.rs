use fnplot_rs::core::gap_filler::{fill_series, fill_values};
use fnplot_rs::core::sampler::sample_function;

#[test]
fn leading_and_trailing_gaps_take_nearest_finite_value() {
    let nan = f64::NAN;
    assert_eq!(fill_values(&[nan, nan, 3.0, nan, nan]), vec![3.0; 5]);
}

#[test]
fn interior_gaps_forward_fill() {
    let nan = f64::NAN;
    assert_eq!(
        fill_values(&[nan, 1.0, nan, f64::INFINITY, 5.0, nan]),
        vec![1.0, 1.0, 1.0, 1.0, 5.0, 5.0]
    );
}

#[test]
fn series_without_finite_values_renders_as_zero_line() {
    let samples = sample_function(&|_x: f64| f64::NAN, -1.0, 1.0, 4);
    let points = fill_series(&samples);
    assert_eq!(points.len(), 4);
    assert!(points.iter().all(|p| p.y == 0.0));
    assert_eq!(points[0].x, -1.0);
}

#[test]
fn filled_series_uses_clamped_values() {
    let samples = sample_function(&|x: f64| if x > 0.5 { 1e9 } else { f64::NAN }, 0.0, 1.0, 3);
    let points = fill_series(&samples);
    assert_eq!(points.iter().map(|p| p.y).collect::<Vec<_>>(), vec![1e4; 3]);
}

#[test]
fn empty_input_stays_empty() {
    assert!(fill_values(&[]).is_empty());
}
