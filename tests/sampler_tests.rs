use fnplot_rs::core::evaluator::Fallible;
use fnplot_rs::core::sampler::{
    DRAW_Y_BOUND, SampleDensity, is_wholly_non_finite, sample_function, second_derivative_step,
};
use fnplot_rs::core::Interval;

#[test]
fn samples_cover_closed_interval() {
    let samples = sample_function(&|x: f64| x * x, -2.0, 3.0, 11);
    assert_eq!(samples.len(), 11);
    assert_eq!(samples[0].x, -2.0);
    assert!((samples[10].x - 3.0).abs() <= 1e-12);
    assert!(samples.windows(2).all(|w| w[0].x < w[1].x));
    assert!((samples[1].y_raw - 2.25).abs() <= 1e-12);
}

#[test]
fn failures_become_nan_without_retry() {
    let calls = std::sync::atomic::AtomicUsize::new(0);
    let f = Fallible(|x: f64| {
        calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        (x >= 0.0).then_some(x.sqrt())
    });
    let samples = sample_function(&f, -1.0, 1.0, 5);

    assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 5);
    assert!(samples[0].y_raw.is_nan());
    assert!(samples[1].y_raw.is_nan());
    assert_eq!(samples[2].y_raw, 0.0);
    assert!(samples[0].y_clamped.is_nan());
}

#[test]
fn non_finite_outputs_are_recorded_as_nan() {
    let samples = sample_function(&|x: f64| 1.0 / x, -1.0, 1.0, 3);
    assert!(samples[1].y_raw.is_nan());
    assert!(!is_wholly_non_finite(&samples));

    let all_bad = sample_function(&|_x: f64| f64::INFINITY, 0.0, 1.0, 4);
    assert!(is_wholly_non_finite(&all_bad));
}

#[test]
fn drawing_values_are_clamped_but_raw_values_are_kept() {
    let samples = sample_function(&|x: f64| x * 1e6, 0.0, 1.0, 2);
    assert_eq!(samples[1].y_raw, 1e6);
    assert_eq!(samples[1].y_clamped, DRAW_Y_BOUND);
}

#[test]
fn density_tracks_plot_width() {
    let density = SampleDensity::default();
    assert_eq!(density.primary(300.0), 500);
    assert_eq!(density.primary(1280.0), 1280);
    assert_eq!(density.primary(3840.0), 2000);
    assert_eq!(density.derivative(1280), 704);
    assert_eq!(density.derivative(2000), 1100);
    assert_eq!(density.derivative(350), 200);
}

#[test]
fn second_derivative_step_is_domain_span_over_derivative_density() {
    let domain = Interval::new(-5.0, 5.0).expect("domain");
    assert!((second_derivative_step(domain, 330) - 10.0 / 330.0).abs() <= 1e-15);
}
