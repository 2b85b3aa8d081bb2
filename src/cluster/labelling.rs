//! Similarity filtering of a neighbourhood and selection of the next seeds.

use super::neighbors::Neighborhood;
use super::working_set::WorkingSet;
use crate::config::ClusterParams;
use crate::math::{bearing, in_opposite_arc, orientation_difference};

/// Similarity thresholds of a run. All comparisons are strict (`<`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Neighbourhood radius around the seed centroid.
    pub distance: f64,
    /// Maximum orientation difference, in degrees.
    pub orient: f64,
    /// Maximum length difference.
    pub length: f64,
}

impl From<&ClusterParams> for Thresholds {
    fn from(params: &ClusterParams) -> Self {
        Self {
            distance: params.th_distance,
            orient: params.th_orient,
            length: params.th_length,
        }
    }
}

/// Outcome of expanding one seed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propagation {
    /// Accepted working indices, in candidate order.
    pub accepted: Vec<usize>,
    /// Distances of the accepted indices to the seed, parallel to `accepted`.
    pub distances: Vec<f64>,
    /// Farthest accepted candidate.
    pub new_seed: Option<usize>,
    /// Farthest accepted candidate lying opposite to `new_seed`.
    pub new_seed2: Option<usize>,
}

impl Propagation {
    /// Returns `true` if no candidate passed the similarity filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Labels the candidates similar to `seed` and nominates up to two new seeds.
///
/// A candidate is accepted when its length differs from the seed's by less
/// than `thresholds.length` and its orientation by less than
/// `thresholds.orient`. The primary new seed is the farthest accepted
/// candidate. The secondary one is the farthest accepted candidate whose
/// bearing from the seed lies at least 90 degrees away from the primary's,
/// so growth continues in both directions along the trend. Ties go to the
/// first candidate in `neighborhood` order.
#[must_use]
pub fn propagate(
    working_set: &WorkingSet,
    seed: usize,
    neighborhood: &Neighborhood,
    thresholds: &Thresholds,
) -> Propagation {
    let Some(seed_entry) = working_set.get(seed) else {
        return Propagation::default();
    };
    let entries = working_set.entries();

    let mut out = Propagation::default();
    for (i, d) in neighborhood.iter() {
        let candidate = &entries[i];
        let similar_length = (candidate.length - seed_entry.length).abs() < thresholds.length;
        let similar_orient =
            orientation_difference(candidate.on, seed_entry.on) < thresholds.orient;
        if similar_length && similar_orient && i != seed {
            out.accepted.push(i);
            out.distances.push(d);
        }
    }

    let Some(primary) = farthest(out.distances.iter().copied().enumerate()) else {
        return out;
    };
    out.new_seed = Some(out.accepted[primary]).filter(|&s| s != seed);

    let bearings: Vec<Option<f64>> = out
        .accepted
        .iter()
        .map(|&i| bearing(&entries[i].centroid, &seed_entry.centroid))
        .collect();

    // An undefined bearing for the primary seed leaves no direction to oppose.
    if let Some(dir_ns) = bearings[primary] {
        let opposite = bearings
            .iter()
            .zip(out.distances.iter())
            .enumerate()
            .filter_map(|(pos, (rd, &d))| match rd {
                Some(rd) if in_opposite_arc(*rd, dir_ns) => Some((pos, d)),
                _ => None,
            });
        out.new_seed2 = farthest(opposite)
            .map(|pos| out.accepted[pos])
            .filter(|&s| s != seed);
    }

    out
}

/// Position of the largest distance, keeping the first on ties.
fn farthest<I>(distances: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut best: Option<(usize, f64)> = None;
    for (pos, d) in distances {
        match best {
            Some((_, best_d)) if d <= best_d => {}
            _ => best = Some((pos, d)),
        }
    }
    best.map(|(pos, _)| pos)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cluster::fixtures::segments;
    use crate::cluster::neighbors::{LinearScan, NeighborSearch};
    use crate::cluster::working_set::UsedSeeds;

    fn run(ws: &WorkingSet, seed: usize, th: &Thresholds) -> Propagation {
        let mut used = UsedSeeds::with_len(ws.len());
        used.insert(seed);
        let n = LinearScan::new(ws).within(seed, th.distance, &used);
        propagate(ws, seed, &n, th)
    }

    const TH: Thresholds = Thresholds {
        distance: 5000.0,
        orient: 5.0,
        length: 50.0,
    };

    #[test]
    fn accepts_similar_neighbours() {
        let ws = segments(&[
            ((0.0, 0.0), 500.0, 10.0),
            ((100.0, 0.0), 520.0, 12.0),
            ((0.0, 4000.0), 510.0, 9.0),
            ((9000.0, 9000.0), 4000.0, 80.0),
        ]);
        let p = run(&ws, 0, &TH);
        assert_eq!(p.accepted, vec![1, 2]);
        assert_eq!(p.new_seed, Some(2));
        // Due east is exactly 90 degrees from the northern primary, on the
        // closed edge of the opposite arc.
        assert_eq!(p.new_seed2, Some(1));
    }

    #[test]
    fn rejects_dissimilar_length_and_orientation() {
        let ws = segments(&[
            ((0.0, 0.0), 500.0, 10.0),
            ((0.0, 100.0), 600.0, 10.0),
            ((0.0, 200.0), 500.0, 16.0),
            ((0.0, 300.0), 549.0, 14.9),
        ]);
        let p = run(&ws, 0, &TH);
        assert_eq!(p.accepted, vec![3]);
    }

    #[test]
    fn orientation_difference_wraps() {
        let ws = segments(&[((0.0, 0.0), 500.0, 1.0), ((0.0, 100.0), 500.0, 178.0)]);
        let p = run(&ws, 0, &TH);
        assert_eq!(p.accepted, vec![1]);
    }

    #[test]
    fn picks_seeds_in_both_directions() {
        let ws = segments(&[
            ((0.0, 0.0), 500.0, 0.0),
            ((0.0, 1000.0), 500.0, 0.0),
            ((0.0, 3000.0), 500.0, 0.0),
            ((0.0, -2000.0), 500.0, 0.0),
            ((50.0, -1000.0), 500.0, 0.0),
        ]);
        let p = run(&ws, 0, &TH);
        assert_eq!(p.accepted, vec![1, 2, 3, 4]);
        assert_eq!(p.new_seed, Some(2));
        assert_eq!(p.new_seed2, Some(3));
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let ws = segments(&[
            ((0.0, 0.0), 500.0, 0.0),
            ((0.0, 1000.0), 500.0, 0.0),
            ((0.0, -1000.0), 500.0, 0.0),
            ((0.0, 1000.0), 500.0, 0.0),
            ((0.0, -1000.0), 500.0, 0.0),
        ]);
        let p = run(&ws, 0, &TH);
        assert_eq!(p.new_seed, Some(1));
        assert_eq!(p.new_seed2, Some(2));
    }

    #[test]
    fn coincident_candidate_has_no_bearing() {
        let ws = segments(&[
            ((0.0, 0.0), 500.0, 0.0),
            ((0.0, 0.0), 500.0, 2.0),
            ((0.0, 800.0), 500.0, 0.0),
        ]);
        let p = run(&ws, 0, &TH);
        assert_eq!(p.accepted, vec![1, 2]);
        assert_eq!(p.new_seed, Some(2));
        assert_eq!(p.new_seed2, None);
    }

    #[test]
    fn empty_neighbourhood_yields_nothing() {
        let ws = segments(&[((0.0, 0.0), 500.0, 0.0), ((0.0, 100.0), 500.0, 45.0)]);
        let p = run(&ws, 0, &TH);
        assert!(p.is_empty());
        assert_eq!(p.new_seed, None);
        assert_eq!(p.new_seed2, None);
    }

    #[test]
    fn seed_is_never_accepted() {
        let ws = segments(&[((0.0, 0.0), 500.0, 0.0), ((0.0, 100.0), 500.0, 0.0)]);
        let n = LinearScan::new(&ws).within(0, TH.distance, &UsedSeeds::with_len(ws.len()));
        assert_eq!(n.indices, vec![0, 1]);
        let p = propagate(&ws, 0, &n, &TH);
        assert_eq!(p.accepted, vec![1]);
        assert_eq!(p.new_seed, Some(1));
    }

    #[test]
    fn farthest_keeps_first_on_ties() {
        assert_eq!(farthest([(0, 1.0), (1, 3.0), (2, 3.0)]), Some(1));
        assert_eq!(farthest(std::iter::empty()), None);
    }
}
