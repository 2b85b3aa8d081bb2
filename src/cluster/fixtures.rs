//! Synthetic lineament layouts shared by the clustering tests.

use super::working_set::WorkingSet;
use crate::lineament::{LineamentStore, RawFeature};
use crate::math::Point2;

/// Builds a store of segments given as `(centroid, length, azimuth)`, with
/// azimuths in degrees clockwise from north.
pub(crate) fn store(specs: &[((f64, f64), f64, f64)], label: i64) -> LineamentStore {
    let mut store = LineamentStore::new();
    let report = store.ingest(specs.iter().enumerate().map(|(i, &((x, y), len, az))| {
        let (s, c) = az.to_radians().sin_cos();
        let (hx, hy) = (0.5 * len * s, 0.5 * len * c);
        RawFeature::segment(
            i64::try_from(i).unwrap_or(i64::MAX),
            Point2::new(x - hx, y - hy),
            Point2::new(x + hx, y + hy),
            Some(label),
        )
    }));
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    store
}

/// Same as [`store`], filtered to the working set of label 1.
pub(crate) fn segments(specs: &[((f64, f64), f64, f64)]) -> WorkingSet {
    WorkingSet::from_store(&store(specs, 0), 1)
}

/// Collinear north-south segments spaced `step` apart along the y axis.
pub(crate) fn chain(count: usize, step: f64) -> Vec<((f64, f64), f64, f64)> {
    (0..count)
        .map(|i| ((0.0, step * i as f64), 500.0, 0.0))
        .collect()
}
