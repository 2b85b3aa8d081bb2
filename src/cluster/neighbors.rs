//! Radius queries around a seed centroid.
//!
//! Both backends apply the same three filters: a square prefilter of side
//! `2 * radius` centred on the seed (strict bounds), removal of working
//! indices already used as seeds, and a strict circular cut `d < radius`.
//! Results are always returned in ascending working-index order, which the
//! tie-breaking in [`super::labelling`] depends on.

use std::collections::HashMap;

use super::working_set::{UsedSeeds, WorkingSet};
use crate::math::Point2;

/// Candidate working indices around a seed, with their centroid distances.
///
/// `indices` and `distances` are parallel and sorted by working index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    pub indices: Vec<usize>,
    pub distances: Vec<f64>,
}

impl Neighborhood {
    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no candidate is in range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over `(index, distance)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.distances.iter().copied())
    }
}

/// Radius query over the centroids of a working set.
pub trait NeighborSearch {
    /// Returns the unused working indices whose centroid lies strictly
    /// within `radius` of the centroid of `seed`.
    fn within(&self, seed: usize, radius: f64, used: &UsedSeeds) -> Neighborhood;
}

/// Bounding-box prefilter plus linear scan over every entry.
#[derive(Debug, Clone, Copy)]
pub struct LinearScan<'a> {
    working_set: &'a WorkingSet,
}

impl<'a> LinearScan<'a> {
    /// Creates a linear search over `working_set`.
    #[must_use]
    pub fn new(working_set: &'a WorkingSet) -> Self {
        Self { working_set }
    }
}

impl NeighborSearch for LinearScan<'_> {
    fn within(&self, seed: usize, radius: f64, used: &UsedSeeds) -> Neighborhood {
        refine(self.working_set, seed, radius, used, 0..self.working_set.len())
    }
}

/// Uniform grid buckets keyed by cell coordinates.
///
/// Each centroid is stored in exactly one cell. A query visits the cells
/// overlapping the seed's bounding square and then applies the same filters
/// as [`LinearScan`].
#[derive(Debug, Clone)]
pub struct GridIndex<'a> {
    working_set: &'a WorkingSet,
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> GridIndex<'a> {
    /// Builds a grid over the centroids of `working_set`.
    ///
    /// A non-finite or non-positive `cell_size` falls back to 1.0.
    #[must_use]
    pub fn new(working_set: &'a WorkingSet, cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };

        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, entry) in working_set.entries().iter().enumerate() {
            cells
                .entry(cell_of(&entry.centroid, cell_size))
                .or_default()
                .push(i);
        }

        Self {
            working_set,
            cell_size,
            cells,
        }
    }

    /// Side length of a grid cell.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

impl NeighborSearch for GridIndex<'_> {
    fn within(&self, seed: usize, radius: f64, used: &UsedSeeds) -> Neighborhood {
        let Some(center) = self.working_set.get(seed).map(|e| e.centroid) else {
            return Neighborhood::default();
        };
        if radius.is_nan() || radius <= 0.0 {
            return Neighborhood::default();
        }

        let (min_cx, min_cy) = cell_of(
            &Point2::new(center.x - radius, center.y - radius),
            self.cell_size,
        );
        let (max_cx, max_cy) = cell_of(
            &Point2::new(center.x + radius, center.y + radius),
            self.cell_size,
        );

        let in_range = |&(cx, cy): &(i64, i64)| {
            (min_cx..=max_cx).contains(&cx) && (min_cy..=max_cy).contains(&cy)
        };

        // Wide queries, including ranges too large to count, walk the
        // occupied cells instead of the covered range.
        let occupied = u64::try_from(self.cells.len()).unwrap_or(u64::MAX);
        let walk_range = cell_span(min_cx, max_cx)
            .zip(cell_span(min_cy, max_cy))
            .and_then(|(w, h)| w.checked_mul(h))
            .is_some_and(|span| span <= occupied);

        let mut candidates: Vec<usize> = if walk_range {
            let mut out = Vec::new();
            for cx in min_cx..=max_cx {
                for cy in min_cy..=max_cy {
                    if let Some(bucket) = self.cells.get(&(cx, cy)) {
                        out.extend_from_slice(bucket);
                    }
                }
            }
            out
        } else {
            self.cells
                .iter()
                .filter(|(key, _)| in_range(*key))
                .flat_map(|(_, bucket)| bucket.iter().copied())
                .collect()
        };
        candidates.sort_unstable();

        refine(self.working_set, seed, radius, used, candidates)
    }
}

/// Number of cells in `min..=max`, `None` if it does not fit in a `u64`.
fn cell_span(min: i64, max: i64) -> Option<u64> {
    max.abs_diff(min).checked_add(1)
}

#[allow(clippy::cast_possible_truncation)]
fn cell_of(p: &Point2, cell_size: f64) -> (i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}

/// Applies the box, used-seed and circular filters to `candidates`, which
/// must be in ascending order.
fn refine<I>(
    working_set: &WorkingSet,
    seed: usize,
    radius: f64,
    used: &UsedSeeds,
    candidates: I,
) -> Neighborhood
where
    I: IntoIterator<Item = usize>,
{
    let Some(center) = working_set.get(seed).map(|e| e.centroid) else {
        return Neighborhood::default();
    };
    let entries = working_set.entries();

    let mut out = Neighborhood::default();
    for i in candidates {
        let c = entries[i].centroid;
        let in_box = c.x > center.x - radius
            && c.x < center.x + radius
            && c.y > center.y - radius
            && c.y < center.y + radius;
        if !in_box || used.contains(i) {
            continue;
        }
        let d = (c - center).norm();
        if d < radius {
            out.indices.push(i);
            out.distances.push(d);
        }
    }
    out
}
