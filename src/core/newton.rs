use serde::{Deserialize, Serialize};

use crate::core::evaluator::{Evaluator, evaluate_finite};

const SMALL_DERIVATIVE: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonOptions {
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iter: 10,
            tol: 1e-8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepNote {
    /// `|f'(x)|` fell below `1e-14`; no update was attempted.
    SmallDerivative,
}

/// One Newton–Raphson iteration as it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonStep {
    pub i: usize,
    pub x: f64,
    pub fx: f64,
    pub dfx: f64,
    pub x_next: Option<f64>,
    pub note: Option<StepNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewtonReport {
    pub steps: Vec<NewtonStep>,
    pub converged: bool,
    pub root: f64,
    /// `f(root)`, `NaN` when the evaluator fails there.
    pub residual: f64,
}

/// Iterates `x ← x - f(x)/f'(x)` from `x0`, tracing every step.
///
/// Stops early when `f` or `f'` is non-finite, when `|f'(x)| < 1e-14`,
/// or when an update is not finite. The root is the last computed
/// `x_next`, falling back to the iterate where the run stopped.
#[must_use]
pub fn newton_raphson(
    f: &dyn Evaluator,
    df: &dyn Evaluator,
    x0: f64,
    options: NewtonOptions,
) -> NewtonReport {
    let mut steps = Vec::new();
    if !x0.is_finite() {
        return NewtonReport {
            steps,
            converged: false,
            root: f64::NAN,
            residual: f64::NAN,
        };
    }

    let mut x = x0;
    for i in 0..options.max_iter {
        let fx = evaluate_finite(f, x);
        let dfx = evaluate_finite(df, x);
        if !fx.is_finite() || !dfx.is_finite() {
            break;
        }
        if dfx.abs() < SMALL_DERIVATIVE {
            steps.push(NewtonStep {
                i,
                x,
                fx,
                dfx,
                x_next: None,
                note: Some(StepNote::SmallDerivative),
            });
            break;
        }

        let x_next = x - fx / dfx;
        steps.push(NewtonStep {
            i,
            x,
            fx,
            dfx,
            x_next: Some(x_next),
            note: None,
        });
        if !x_next.is_finite() {
            break;
        }
        let settled = (x_next - x).abs() < options.tol;
        x = x_next;
        if settled {
            break;
        }
    }

    let root = steps
        .last()
        .and_then(|step| step.x_next)
        .unwrap_or(x);
    let residual = evaluate_finite(f, root);
    let converged = root.is_finite()
        && residual.is_finite()
        && steps.last().is_some_and(|step| {
            step.x_next
                .is_some_and(|next| (next - step.x).abs() < options.tol)
        });

    NewtonReport {
        steps,
        converged,
        root,
        residual,
    }
}

#[cfg(test)]
mod tests {
    use super::{NewtonOptions, StepNote, newton_raphson};

    #[test]
    fn square_root_of_two() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;
        let report = newton_raphson(&f, &df, 1.0, NewtonOptions::default());
        assert!(report.converged);
        assert!(report.steps.len() <= 10);
        assert!((report.root - 2f64.sqrt()).abs() <= 1e-8);
        assert!(report.residual.abs() <= 1e-12);
    }

    #[test]
    fn flat_derivative_is_tagged_and_not_converged() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;
        let report = newton_raphson(&f, &df, 0.0, NewtonOptions::default());
        assert!(!report.converged);
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].note, Some(StepNote::SmallDerivative));
        assert_eq!(report.root, 0.0);
    }

    #[test]
    fn non_finite_start_yields_empty_trace() {
        let f = |x: f64| x;
        let report = newton_raphson(&f, &f, f64::NAN, NewtonOptions::default());
        assert!(report.steps.is_empty());
        assert!(report.root.is_nan());
        assert!(!report.converged);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let f = |x: f64| x.cbrt();
        let df = |x: f64| 1.0 / (3.0 * x.cbrt().powi(2));
        let options = NewtonOptions {
            max_iter: 5,
            ..NewtonOptions::default()
        };
        let report = newton_raphson(&f, &df, 1.0, options);
        assert_eq!(report.steps.len(), 5);
        assert!(!report.converged);
    }
}
