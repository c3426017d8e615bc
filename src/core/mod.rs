pub mod evaluator;
pub mod features;
pub mod gap_filler;
pub mod hit_test;
pub mod newton;
pub mod range_estimator;
pub mod sampler;
pub mod scale;
pub mod taylor;
pub mod types;
pub mod viewport;

pub use evaluator::{CentralDifference, Evaluator, Fallible, SecondDifference, SharedEvaluator};
pub use features::{Feature, FeatureKind, find_extrema, find_intersections, find_roots};
pub use gap_filler::{fill_series, fill_values};
pub use newton::{NewtonOptions, NewtonReport, NewtonStep, StepNote, newton_raphson};
pub use range_estimator::robust_y_range;
pub use sampler::{DRAW_Y_BOUND, Sample, SampleDensity, sample_function};
pub use scale::{AxisDirection, LinearScale};
pub use taylor::{
    ClosedForm, ExpressionId, TaylorCache, TaylorKey, TaylorPolynomial, TaylorTerm,
    taylor_from_expr,
};
pub use types::{DataPoint, Interval, ManualPoint, PixelPoint, PlotArea};
pub use viewport::{AxisLock, Viewport};
