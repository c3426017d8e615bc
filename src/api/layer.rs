use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::evaluator::{CentralDifference, SharedEvaluator};
use crate::core::taylor::{ExpressionId, TaylorKey};

/// Host-assigned layer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// Taylor overlay parameters of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaylorSettings {
    pub center: f64,
    /// Requested number of non-negligible terms, clamped to `[1, 24]`.
    pub degree: u32,
    pub shown: bool,
}

impl Default for TaylorSettings {
    fn default() -> Self {
        Self {
            center: 0.0,
            degree: 5,
            shown: false,
        }
    }
}

impl TaylorSettings {
    #[must_use]
    pub fn shown(center: f64, degree: u32) -> Self {
        Self {
            center,
            degree,
            shown: true,
        }
    }
}

/// One plotted function.
///
/// Evaluators come from the host's expression layer. A layer whose
/// expression is blank is kept but draws nothing.
#[derive(Clone)]
pub struct Layer {
    id: LayerId,
    expression: ExpressionId,
    evaluator: SharedEvaluator,
    derivative: Option<SharedEvaluator>,
    show_first_derivative: bool,
    show_second_derivative: bool,
    taylor: TaylorSettings,
}

impl Layer {
    #[must_use]
    pub fn new(id: LayerId, expression: ExpressionId, evaluator: SharedEvaluator) -> Self {
        Self {
            id,
            expression,
            evaluator,
            derivative: None,
            show_first_derivative: false,
            show_second_derivative: false,
            taylor: TaylorSettings::default(),
        }
    }

    /// Attaches an exact derivative evaluator.
    #[must_use]
    pub fn with_derivative(mut self, derivative: SharedEvaluator) -> Self {
        self.derivative = Some(derivative);
        self
    }

    #[must_use]
    pub fn with_first_derivative_overlay(mut self, shown: bool) -> Self {
        self.show_first_derivative = shown;
        self
    }

    #[must_use]
    pub fn with_second_derivative_overlay(mut self, shown: bool) -> Self {
        self.show_second_derivative = shown;
        self
    }

    #[must_use]
    pub fn with_taylor(mut self, taylor: TaylorSettings) -> Self {
        self.taylor = taylor;
        self
    }

    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[must_use]
    pub fn expression(&self) -> &ExpressionId {
        &self.expression
    }

    #[must_use]
    pub fn evaluator(&self) -> &SharedEvaluator {
        &self.evaluator
    }

    #[must_use]
    pub fn has_exact_derivative(&self) -> bool {
        self.derivative.is_some()
    }

    /// Exact derivative when supplied, central difference otherwise.
    #[must_use]
    pub fn derivative_evaluator(&self) -> SharedEvaluator {
        match &self.derivative {
            Some(derivative) => Arc::clone(derivative),
            None => Arc::new(CentralDifference::new(Arc::clone(&self.evaluator))),
        }
    }

    #[must_use]
    pub fn shows_first_derivative(&self) -> bool {
        self.show_first_derivative
    }

    #[must_use]
    pub fn shows_second_derivative(&self) -> bool {
        self.show_second_derivative
    }

    #[must_use]
    pub fn taylor(&self) -> TaylorSettings {
        self.taylor
    }

    pub fn set_taylor(&mut self, taylor: TaylorSettings) {
        self.taylor = taylor;
    }

    pub fn set_derivative_overlays(&mut self, first: bool, second: bool) {
        self.show_first_derivative = first;
        self.show_second_derivative = second;
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.expression.is_empty()
    }

    /// Cache key of the Taylor overlay, when one should be drawn.
    ///
    /// A non-finite center falls back to `0`.
    #[must_use]
    pub fn taylor_key(&self) -> Option<TaylorKey> {
        if !self.taylor.shown || self.is_blank() {
            return None;
        }
        Some(TaylorKey::new(
            self.expression.clone(),
            self.taylor_center(),
            self.taylor.degree,
        ))
    }

    #[must_use]
    pub fn taylor_center(&self) -> f64 {
        if self.taylor.center.is_finite() {
            self.taylor.center
        } else {
            0.0
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("expression", &self.expression)
            .field("has_exact_derivative", &self.derivative.is_some())
            .field("show_first_derivative", &self.show_first_derivative)
            .field("show_second_derivative", &self.show_second_derivative)
            .field("taylor", &self.taylor)
            .finish()
    }
}
