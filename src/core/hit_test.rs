use ordered_float::OrderedFloat;

use crate::core::features::Feature;
use crate::core::sampler::Sample;
use crate::core::types::{DataPoint, ManualPoint, PixelPoint};
use crate::core::viewport::Viewport;

/// Pick radius around manual points.
pub const MANUAL_POINT_HIT_RADIUS_PX: f64 = 14.0;
/// Snap radius for starting a curve trace.
pub const TRACE_SNAP_RADIUS_PX: f64 = 16.0;
/// Hover radius around roots, extrema and intersections.
pub const FEATURE_HOVER_RADIUS_PX: f64 = 12.0;
/// Horizontal tolerance around the `x = 0` pixel column.
pub const Y_AXIS_HOVER_TOLERANCE_PX: f64 = 10.0;

/// Nearest candidate found by [`nearest_within`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<T> {
    pub item: T,
    pub point: DataPoint,
    pub distance_squared: f64,
}

/// Finds the candidate closest to `pointer` in pixel space, if it lies
/// within `radius_px`.
///
/// Candidates with non-finite coordinates are skipped. Ties keep the
/// earliest candidate.
pub fn nearest_within<T, I>(
    candidates: I,
    viewport: &Viewport,
    pointer: PixelPoint,
    radius_px: f64,
) -> Option<Hit<T>>
where
    I: IntoIterator<Item = (DataPoint, T)>,
{
    candidates
        .into_iter()
        .filter(|(point, _)| point.x.is_finite() && point.y.is_finite())
        .map(|(point, item)| {
            let distance_squared = viewport.data_to_pixel(point).distance_squared(pointer);
            (OrderedFloat(distance_squared), point, item)
        })
        .min_by_key(|(d, _, _)| *d)
        .filter(|(d, _, _)| d.0 <= radius_px * radius_px)
        .map(|(d, point, item)| Hit {
            item,
            point,
            distance_squared: d.0,
        })
}

/// Id of the manual point under the pointer.
#[must_use]
pub fn hit_manual_point(
    points: &[ManualPoint],
    viewport: &Viewport,
    pointer: PixelPoint,
) -> Option<u64> {
    nearest_within(
        points.iter().map(|p| (DataPoint::new(p.x, p.y), p.id)),
        viewport,
        pointer,
        MANUAL_POINT_HIT_RADIUS_PX,
    )
    .map(|hit| hit.item)
}

/// Sample nearest to the pointer across several series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    /// Position of the series in the slice passed to [`nearest_curve_sample`].
    pub series_index: usize,
    pub x: f64,
    pub y: f64,
}

/// Finds the sample nearest to the pointer within the trace snap radius.
///
/// Distance is measured at the drawn (clamped) position; the reported `y`
/// is the raw value.
#[must_use]
pub fn nearest_curve_sample(
    series: &[&[Sample]],
    viewport: &Viewport,
    pointer: PixelPoint,
) -> Option<CurveHit> {
    let candidates = series.iter().enumerate().flat_map(|(series_index, samples)| {
        samples.iter().map(move |s| {
            (
                DataPoint::new(s.x, s.y_clamped),
                CurveHit {
                    series_index,
                    x: s.x,
                    y: s.y_raw,
                },
            )
        })
    });
    nearest_within(candidates, viewport, pointer, TRACE_SNAP_RADIUS_PX).map(|hit| hit.item)
}

/// Feature nearest to the pointer within the hover radius.
#[must_use]
pub fn nearest_feature(
    sets: &[&[Feature]],
    viewport: &Viewport,
    pointer: PixelPoint,
) -> Option<Feature> {
    let candidates = sets
        .iter()
        .flat_map(|set| set.iter().map(|f| (DataPoint::new(f.x, f.y), *f)));
    nearest_within(candidates, viewport, pointer, FEATURE_HOVER_RADIUS_PX).map(|hit| hit.item)
}

/// Returns `true` when the pointer is close to the vertical `x = 0` line
/// inside the plot's vertical extent.
#[must_use]
pub fn is_near_y_axis(viewport: &Viewport, pointer: PixelPoint) -> bool {
    let area = viewport.area();
    let axis_px = viewport.data_to_pixel(DataPoint::new(0.0, 0.0)).x;
    (pointer.x - axis_px).abs() <= Y_AXIS_HOVER_TOLERANCE_PX
        && pointer.y >= area.top
        && pointer.y <= area.top + area.height
}

#[cfg(test)]
mod tests {
    use super::{hit_manual_point, nearest_curve_sample, nearest_feature};
    use crate::core::features::{Feature, FeatureKind};
    use crate::core::sampler::Sample;
    use crate::core::types::{DataPoint, Interval, ManualPoint, PixelPoint, PlotArea};
    use crate::core::viewport::Viewport;

    fn viewport() -> Viewport {
        Viewport::new(
            PlotArea::sized(1000.0, 1000.0),
            Interval::new(0.0, 1000.0).expect("domain"),
            Interval::new(0.0, 1000.0).expect("range"),
        )
        .expect("viewport")
    }

    #[test]
    fn manual_point_radius_is_fourteen_pixels() {
        let vp = viewport();
        let points = [ManualPoint::new(7, 100.0, 900.0)];
        let at = vp.data_to_pixel(DataPoint::new(100.0, 900.0));
        assert_eq!(
            hit_manual_point(&points, &vp, PixelPoint::new(at.x + 13.9, at.y)),
            Some(7)
        );
        assert_eq!(
            hit_manual_point(&points, &vp, PixelPoint::new(at.x + 14.1, at.y)),
            None
        );
    }

    #[test]
    fn nearest_feature_wins_across_sets() {
        let vp = viewport();
        let roots = [Feature::new(500.0, 500.0, FeatureKind::Root)];
        let extrema = [Feature::new(505.0, 500.0, FeatureKind::Extremum)];
        let pointer = vp.data_to_pixel(DataPoint::new(504.0, 500.0));
        let hit = nearest_feature(&[&roots, &extrema], &vp, pointer).expect("hit");
        assert_eq!(hit.kind, FeatureKind::Extremum);
    }

    #[test]
    fn curve_hit_reports_raw_value_and_series_index() {
        let vp = viewport();
        let first = [Sample::new(100.0, 100.0)];
        let second = [Sample::new(400.0, 20_000.0)];
        let pointer = vp.data_to_pixel(DataPoint::new(400.0, 10_000.0));
        assert!(nearest_curve_sample(&[&first, &second], &vp, pointer).is_none());

        let pointer = vp.data_to_pixel(DataPoint::new(103.0, 95.0));
        let hit = nearest_curve_sample(&[&first, &second], &vp, pointer).expect("hit");
        assert_eq!(hit.series_index, 0);
        assert_eq!(hit.y, 100.0);
    }
}
