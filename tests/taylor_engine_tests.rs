use std::sync::Arc;

use approx::assert_abs_diff_eq;
use fnplot_rs::core::evaluator::{Evaluator, SharedEvaluator};
use fnplot_rs::core::taylor::{
    ClosedForm, ExpressionId, MAX_TAYLOR_DEGREE, TaylorCache, TaylorKey, taylor_from_expr,
};

fn sine() -> SharedEvaluator {
    Arc::new(f64::sin)
}

#[test]
fn sine_maclaurin_matches_reference_values() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("sin(x)").with_closed_form(ClosedForm::Sine);
    let poly = taylor_from_expr(&mut cache, &expr, sine, 0.0, 5);

    let expected = 1.0 - 1.0 / 6.0 + 1.0 / 120.0 - 1.0 / 5040.0 + 1.0 / 362_880.0;
    assert_abs_diff_eq!(poly.value_at(1.0), expected, epsilon = 1e-15);
    assert_abs_diff_eq!(poly.value_at(1.0), 1.0f64.sin(), epsilon = 1e-3);
    assert_eq!(poly.value_at(0.0), 0.0);
}

#[test]
fn untagged_sine_uses_numeric_path_with_similar_accuracy() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("sin(x)");
    let poly = taylor_from_expr(&mut cache, &expr, sine, 0.0, 3);

    assert_eq!(poly.terms().len(), 3);
    assert_eq!(poly.terms()[0].power, 1);
    assert_abs_diff_eq!(poly.value_at(0.5), 0.5f64.sin(), epsilon = 1e-3);
}

#[test]
fn exponential_about_nonzero_center() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("exp(x)");
    let poly = taylor_from_expr(&mut cache, &expr, || Arc::new(f64::exp), 1.0, 6);

    assert_eq!(poly.terms().len(), 6);
    assert_abs_diff_eq!(poly.center(), 1.0);
    assert_abs_diff_eq!(poly.value_at(1.0), 1.0f64.exp(), epsilon = 1e-6);
    assert_abs_diff_eq!(poly.value_at(1.2), 1.2f64.exp(), epsilon = 1e-3);
    assert_abs_diff_eq!(poly.evaluate(1.2).expect("finite"), poly.value_at(1.2));
}

#[test]
fn vanishing_orders_are_omitted_up_to_scan_bound() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("3");
    let poly = taylor_from_expr(&mut cache, &expr, || Arc::new(|_x: f64| 3.0), 0.0, 2);

    let powers: Vec<u32> = poly.terms().iter().map(|t| t.power).collect();
    assert_eq!(powers, vec![0]);
    assert_eq!(poly.value_at(10.0), 3.0);
}

#[test]
fn cache_key_uses_clamped_degree() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("exp(x)");
    let first = taylor_from_expr(&mut cache, &expr, || Arc::new(f64::exp), 0.0, 30);
    let second = taylor_from_expr(
        &mut cache,
        &expr,
        || -> SharedEvaluator { panic!("cached entry must be reused") },
        0.0,
        MAX_TAYLOR_DEGREE,
    );

    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.contains(&TaylorKey::new(expr, 0.0, 99)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_centers_are_distinct_entries() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("exp(x)");
    let _ = taylor_from_expr(&mut cache, &expr, || Arc::new(f64::exp), 0.0, 3);
    let _ = taylor_from_expr(&mut cache, &expr, || Arc::new(f64::exp), 0.5, 3);
    assert_eq!(cache.len(), 2);

    let keep = TaylorKey::new(expr, 0.5, 3);
    assert_eq!(cache.retain_referenced([&keep]), 1);
    assert!(cache.contains(&keep));
}

#[test]
fn failing_function_degrades_to_zero_polynomial() {
    let mut cache = TaylorCache::new();
    let expr = ExpressionId::new("log(x)");
    let poly = taylor_from_expr(
        &mut cache,
        &expr,
        || Arc::new(|x: f64| x.ln()),
        -3.0,
        4,
    );
    assert!(poly.is_zero());
    assert_eq!(poly.value_at(-2.0), 0.0);
}
