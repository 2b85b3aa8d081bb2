use crate::lineament::{LineamentId, LineamentStore};
use crate::math::Point2;

/// One member of a [`WorkingSet`], addressed by its working index.
#[derive(Debug, Clone)]
pub struct WorkingEntry {
    /// Key of the lineament in the store.
    pub id: LineamentId,
    /// Global id of the lineament.
    pub fid: i64,
    /// Segment midpoint.
    pub centroid: Point2,
    /// Segment length.
    pub length: f64,
    /// Orientation, in `[0, 180)`.
    pub on: f64,
    /// Complementary orientation.
    pub oe: f64,
}

/// The lineaments eligible for one run: unclassified ones plus those already
/// carrying the run's target label.
///
/// Working indices follow the store's insertion order, so runs over the same
/// store are reproducible.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    label: i64,
    entries: Vec<WorkingEntry>,
}

impl WorkingSet {
    /// Filters `store` down to the lineaments a run for `label` may touch.
    #[must_use]
    pub fn from_store(store: &LineamentStore, label: i64) -> Self {
        let entries = store
            .iter()
            .filter(|(_, l)| l.label() == 0 || l.label() == label)
            .map(|(id, l)| WorkingEntry {
                id,
                fid: l.fid,
                centroid: l.centroid,
                length: l.length,
                on: l.orientation.on,
                oe: l.orientation.oe,
            })
            .collect();
        Self { label, entries }
    }

    /// Target label the set was built for.
    #[must_use]
    pub fn label(&self) -> i64 {
        self.label
    }

    /// Resolves a global id to its working index.
    #[must_use]
    pub fn index_of(&self, fid: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.fid == fid)
    }

    /// Returns the entry at working index `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WorkingEntry> {
        self.entries.get(index)
    }

    /// All entries in working-index order.
    #[must_use]
    pub fn entries(&self) -> &[WorkingEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no lineament is eligible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Working indices that have already been expanded as a seed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedSeeds {
    used: Vec<bool>,
    count: usize,
}

impl UsedSeeds {
    /// Creates an empty set for a working set of `len` entries.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            used: vec![false; len],
            count: 0,
        }
    }

    /// Marks `index` as used. Returns `false` if it was already used.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.used.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    /// Returns whether `index` has been used as a seed.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    /// Number of used seeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no seed has been used yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One flag per working index, `true` for used seeds.
    #[must_use]
    pub fn as_flags(&self) -> &[bool] {
        &self.used
    }
}
