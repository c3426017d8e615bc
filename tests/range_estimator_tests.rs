use fnplot_rs::core::range_estimator::robust_y_range;
use fnplot_rs::core::sampler::{Sample, sample_function};
use fnplot_rs::core::Interval;

fn fallback() -> Interval {
    Interval::new(-2.0, 2.0).expect("fallback")
}

fn series(values: &[f64]) -> Vec<Sample> {
    values
        .iter()
        .enumerate()
        .map(|(i, &y)| Sample::new(i as f64, y))
        .collect()
}

#[test]
fn uniform_values_get_padded_window() {
    let values: Vec<f64> = (0..20).map(|i| -1.0 + 2.0 * f64::from(i) / 19.0).collect();
    let samples = series(&values);
    let range = robust_y_range([samples.as_slice()], fallback());

    assert!(range.min < 0.0 && range.max > 0.0);
    assert!(range.span() > 2.0);
}

#[test]
fn too_few_finite_values_use_fallback() {
    let samples = series(&[1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0, 6.0, f64::NAN, 7.0]);
    assert_eq!(robust_y_range([samples.as_slice()], fallback()), fallback());
    assert_eq!(robust_y_range(std::iter::empty::<&[Sample]>(), fallback()), fallback());
}

#[test]
fn constant_series_gets_unit_pad() {
    let samples = series(&[4.0; 12]);
    let range = robust_y_range([samples.as_slice()], fallback());
    assert_eq!(range, Interval::new(3.0, 5.0).expect("range"));
}

#[test]
fn pole_does_not_blow_up_window() {
    let samples = sample_function(&|x: f64| 1.0 / (x - 0.0005), -1.0, 1.0, 1001);
    let range = robust_y_range([samples.as_slice()], fallback());
    assert!(range.span() < 1e4, "window too wide: {range:?}");
    assert!(range.min < 0.0 && range.max > 0.0);
}

#[test]
fn combines_all_series_and_is_deterministic() {
    let a = sample_function(&|x: f64| x, 0.0, 1.0, 10);
    let b = sample_function(&|x: f64| -x, 0.0, 1.0, 10);
    let first = robust_y_range([a.as_slice(), b.as_slice()], fallback());
    let second = robust_y_range([a.as_slice(), b.as_slice()], fallback());

    assert_eq!(first, second);
    assert!(first.min < -0.9 && first.max > 0.9);
}
