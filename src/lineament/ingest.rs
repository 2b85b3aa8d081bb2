use tracing::warn;

use super::record::Lineament;
use super::store::LineamentStore;
use crate::error::{ClusterError, GeometryError};
use crate::math::Point2;

/// A vector record as delivered by a layer reader.
#[derive(Debug, Clone)]
pub struct RawFeature {
    /// Feature id in the source layer.
    pub fid: i64,
    /// Vertices of the feature geometry.
    pub points: Vec<Point2>,
    /// Existing classification, `None` when the field is absent or unreadable.
    pub label: Option<i64>,
}

impl RawFeature {
    /// Creates a two-point feature.
    #[must_use]
    pub fn segment(fid: i64, start: Point2, end: Point2, label: Option<i64>) -> Self {
        Self {
            fid,
            points: vec![start, end],
            label,
        }
    }
}

/// Why a record was left out of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Geometry(GeometryError),
    Duplicate(ClusterError),
}

/// Summary of an ingestion pass.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Number of lineaments added to the store.
    pub accepted: usize,
    /// Records that were skipped, with their feature id.
    pub skipped: Vec<(i64, SkipReason)>,
}

impl LineamentStore {
    /// Builds lineaments from raw records, skipping degenerate ones.
    ///
    /// Records without exactly two points, with coincident endpoints, with
    /// non-finite coordinates, or repeating an id already stored are skipped
    /// and reported. A missing label is read as 0 (unclassified).
    pub fn ingest<I>(&mut self, features: I) -> IngestReport
    where
        I: IntoIterator<Item = RawFeature>,
    {
        let mut report = IngestReport::default();

        for feature in features {
            let fid = feature.fid;
            let lineament = match to_lineament(feature) {
                Ok(l) => l,
                Err(e) => {
                    warn!(fid, "skipping feature: {e}");
                    report.skipped.push((fid, SkipReason::Geometry(e)));
                    continue;
                }
            };
            match self.add(lineament) {
                Ok(_) => report.accepted += 1,
                Err(e) => {
                    warn!(fid, "skipping feature: {e}");
                    report.skipped.push((fid, SkipReason::Duplicate(e)));
                }
            }
        }

        report
    }
}

fn to_lineament(feature: RawFeature) -> Result<Lineament, GeometryError> {
    let [start, end] = feature.points[..] else {
        return Err(GeometryError::WrongPointCount {
            fid: feature.fid,
            count: feature.points.len(),
        });
    };
    Lineament::new(feature.fid, start, end, feature.label.unwrap_or(0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn ingests_valid_segments() {
        let mut store = LineamentStore::new();
        let report = store.ingest(vec![
            RawFeature::segment(0, p(0.0, 0.0), p(0.0, 10.0), None),
            RawFeature::segment(1, p(5.0, 0.0), p(5.0, 10.0), Some(3)),
        ]);
        assert_eq!(report.accepted, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(store.by_fid(0).unwrap().label(), 0);
        assert_eq!(store.by_fid(1).unwrap().label(), 3);
    }

    #[test]
    fn skips_degenerate_records() {
        let mut store = LineamentStore::new();
        let report = store.ingest(vec![
            RawFeature {
                fid: 0,
                points: vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)],
                label: None,
            },
            RawFeature::segment(1, p(4.0, 4.0), p(4.0, 4.0), None),
            RawFeature::segment(2, p(0.0, 0.0), p(3.0, 4.0), None),
            RawFeature::segment(2, p(1.0, 0.0), p(3.0, 4.0), None),
        ]);

        assert_eq!(report.accepted, 1);
        assert_eq!(
            report.skipped,
            vec![
                (
                    0,
                    SkipReason::Geometry(GeometryError::WrongPointCount { fid: 0, count: 3 })
                ),
                (1, SkipReason::Geometry(GeometryError::ZeroLength { fid: 1 })),
                (2, SkipReason::Duplicate(ClusterError::DuplicateId(2))),
            ]
        );
        assert_eq!(store.len(), 1);
    }
}
