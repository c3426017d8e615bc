use std::sync::Arc;

#[cfg(feature = "parallel-sampling")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::evaluator::SecondDifference;
use crate::core::features::{Feature, find_extrema, find_intersections, find_roots};
use crate::core::gap_filler::fill_series;
use crate::core::range_estimator::robust_y_range;
use crate::core::sampler::{
    Sample, SampleDensity, is_wholly_non_finite, sample_interval, second_derivative_step,
};
use crate::core::types::{DataPoint, Interval};
use crate::core::viewport::Viewport;

use super::{FeatureToggles, Layer, LayerId};

/// Derived data of one layer for the current cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerFrame {
    pub layer_id: LayerId,
    /// Blank expression or no finite sample; nothing is drawn or detected.
    pub hidden: bool,
    /// Raw primary series (`N` samples).
    pub samples: Vec<Sample>,
    /// Gap-filled primary polyline.
    pub curve: Vec<DataPoint>,
    /// Raw first-derivative series (`ND` samples).
    pub derivative: Vec<Sample>,
    pub first_derivative_curve: Option<Vec<DataPoint>>,
    pub second_derivative_curve: Option<Vec<DataPoint>>,
    pub roots: Vec<Feature>,
    pub extrema: Vec<Feature>,
}

impl LayerFrame {
    fn hidden(layer_id: LayerId, samples: Vec<Sample>) -> Self {
        Self {
            layer_id,
            hidden: true,
            samples,
            curve: Vec::new(),
            derivative: Vec::new(),
            first_derivative_curve: None,
            second_derivative_curve: None,
            roots: Vec::new(),
            extrema: Vec::new(),
        }
    }
}

/// Everything derived from Viewport + Layer set in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotFrame {
    pub domain: Interval,
    pub range: Interval,
    pub primary_samples: usize,
    pub derivative_samples: usize,
    /// In configured layer order.
    pub layers: Vec<LayerFrame>,
    pub intersections: Vec<Feature>,
    /// Robust vertical window over all visible primary series.
    pub suggested_range: Interval,
}

impl PlotFrame {
    #[must_use]
    pub fn empty(viewport: &Viewport, fallback: Interval) -> Self {
        Self {
            domain: viewport.domain(),
            range: viewport.range(),
            primary_samples: 0,
            derivative_samples: 0,
            layers: Vec::new(),
            intersections: Vec::new(),
            suggested_range: fallback,
        }
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&LayerFrame> {
        self.layers.iter().find(|frame| frame.layer_id == id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Feature> {
        self.layers.iter().flat_map(|frame| frame.roots.iter())
    }

    pub fn extrema(&self) -> impl Iterator<Item = &Feature> {
        self.layers.iter().flat_map(|frame| frame.extrema.iter())
    }

    /// Roots, then extrema, then intersections.
    #[must_use]
    pub fn features(&self) -> Vec<Feature> {
        self.roots()
            .chain(self.extrema())
            .chain(self.intersections.iter())
            .copied()
            .collect()
    }

    #[must_use]
    pub fn visible_layers(&self) -> usize {
        self.layers.iter().filter(|frame| !frame.hidden).count()
    }
}

/// Sampling parameters shared by every layer in one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CycleGrid {
    domain: Interval,
    primary: usize,
    derivative: usize,
    second_step: f64,
}

/// Samples every layer and derives its features.
///
/// Layers are independent; with `parallel-sampling` they are sampled on
/// the rayon pool and collected back in configured order.
#[must_use]
pub fn build_frame(
    viewport: &Viewport,
    layers: &[Layer],
    density: SampleDensity,
    toggles: FeatureToggles,
    fallback: Interval,
) -> PlotFrame {
    let domain = viewport.domain();
    let primary = density.primary(viewport.area().width);
    let derivative = density.derivative(primary);
    let grid = CycleGrid {
        domain,
        primary,
        derivative,
        second_step: second_derivative_step(domain, derivative),
    };

    #[cfg(feature = "parallel-sampling")]
    let frames: Vec<LayerFrame> = layers
        .par_iter()
        .map(|layer| build_layer_frame(layer, grid, toggles))
        .collect();

    #[cfg(not(feature = "parallel-sampling"))]
    let frames: Vec<LayerFrame> = layers
        .iter()
        .map(|layer| build_layer_frame(layer, grid, toggles))
        .collect();

    let intersections = if toggles.intersections {
        pairwise_intersections(&frames)
    } else {
        Vec::new()
    };
    let suggested_range = robust_y_range(
        frames
            .iter()
            .filter(|frame| !frame.hidden)
            .map(|frame| frame.samples.as_slice()),
        fallback,
    );

    trace!(
        layers = frames.len(),
        primary,
        derivative,
        intersections = intersections.len(),
        "built plot frame"
    );

    PlotFrame {
        domain,
        range: viewport.range(),
        primary_samples: primary,
        derivative_samples: derivative,
        layers: frames,
        intersections,
        suggested_range,
    }
}

fn build_layer_frame(layer: &Layer, grid: CycleGrid, toggles: FeatureToggles) -> LayerFrame {
    if layer.is_blank() {
        return LayerFrame::hidden(layer.id(), Vec::new());
    }

    let f = layer.evaluator();
    let samples = sample_interval(f.as_ref(), grid.domain, grid.primary);
    if is_wholly_non_finite(&samples) {
        return LayerFrame::hidden(layer.id(), samples);
    }

    let needs_derivative = toggles.extrema || layer.shows_first_derivative();
    let derivative = if needs_derivative {
        let df = layer.derivative_evaluator();
        sample_interval(df.as_ref(), grid.domain, grid.derivative)
    } else {
        Vec::new()
    };

    let second_derivative_curve = layer.shows_second_derivative().then(|| {
        let d2 = SecondDifference::new(Arc::clone(f), grid.second_step);
        fill_series(&sample_interval(&d2, grid.domain, grid.derivative))
    });
    let first_derivative_curve = layer
        .shows_first_derivative()
        .then(|| fill_series(&derivative));

    let roots = if toggles.roots {
        find_roots(&samples)
    } else {
        Vec::new()
    };
    let extrema = if toggles.extrema {
        find_extrema(&derivative, f.as_ref())
    } else {
        Vec::new()
    };

    LayerFrame {
        layer_id: layer.id(),
        hidden: false,
        curve: fill_series(&samples),
        samples,
        derivative,
        first_derivative_curve,
        second_derivative_curve,
        roots,
        extrema,
    }
}

/// Every unordered pair of visible layers, in configured order.
fn pairwise_intersections(frames: &[LayerFrame]) -> Vec<Feature> {
    let visible: Vec<&LayerFrame> = frames.iter().filter(|frame| !frame.hidden).collect();
    let mut out = Vec::new();
    for (i, a) in visible.iter().enumerate() {
        for b in &visible[i + 1..] {
            out.extend(find_intersections(&a.samples, &b.samples));
        }
    }
    out
}
