use std::collections::HashMap;

use slotmap::SlotMap;

use super::record::{Attributes, Lineament, LineamentId};
use crate::error::ClusterError;

/// Central arena that owns all lineaments of a layer.
///
/// Lineaments are addressed by generational [`LineamentId`] keys and can be
/// looked up by their caller-supplied global id. Insertion order is kept
/// separately and defines the working-index order of every clustering run.
#[derive(Debug, Default)]
pub struct LineamentStore {
    lineaments: SlotMap<LineamentId, Lineament>,
    by_fid: HashMap<i64, LineamentId>,
    order: Vec<LineamentId>,
}

impl LineamentStore {
    /// Creates a new, empty lineament store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a lineament and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::DuplicateId`] if a lineament with the same
    /// global id is already stored.
    pub fn add(&mut self, lineament: Lineament) -> Result<LineamentId, ClusterError> {
        if self.by_fid.contains_key(&lineament.fid) {
            return Err(ClusterError::DuplicateId(lineament.fid));
        }
        let fid = lineament.fid;
        let id = self.lineaments.insert(lineament);
        self.by_fid.insert(fid, id);
        self.order.push(id);
        Ok(id)
    }

    /// Returns the lineament with the given key, if present.
    #[must_use]
    pub fn get(&self, id: LineamentId) -> Option<&Lineament> {
        self.lineaments.get(id)
    }

    /// Returns the key of the lineament with global id `fid`, if present.
    #[must_use]
    pub fn id_of(&self, fid: i64) -> Option<LineamentId> {
        self.by_fid.get(&fid).copied()
    }

    /// Returns the lineament with global id `fid`, if present.
    #[must_use]
    pub fn by_fid(&self, fid: i64) -> Option<&Lineament> {
        self.id_of(fid).and_then(|id| self.lineaments.get(id))
    }

    /// Returns a mutable reference to the attributes of a lineament.
    pub fn attributes_mut(&mut self, id: LineamentId) -> Option<&mut Attributes> {
        self.lineaments.get_mut(id).map(|l| &mut l.attributes)
    }

    /// Iterates over lineaments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (LineamentId, &Lineament)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.lineaments.get(id).map(|l| (id, l)))
    }

    /// Number of stored lineaments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lineaments.len()
    }

    /// Returns `true` if the store holds no lineaments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lineaments.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn segment(fid: i64, x: f64) -> Lineament {
        Lineament::new(fid, Point2::new(x, 0.0), Point2::new(x, 10.0), 0).unwrap()
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = LineamentStore::new();
        for fid in [30, 10, 20] {
            store.add(segment(fid, fid as f64)).unwrap();
        }
        let fids: Vec<i64> = store.iter().map(|(_, l)| l.fid).collect();
        assert_eq!(fids, vec![30, 10, 20]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn looks_up_by_global_id() {
        let mut store = LineamentStore::new();
        let id = store.add(segment(5, 1.0)).unwrap();
        assert_eq!(store.id_of(5), Some(id));
        assert_eq!(store.by_fid(5).unwrap().fid, 5);
        assert!(store.by_fid(6).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut store = LineamentStore::new();
        store.add(segment(1, 0.0)).unwrap();
        let err = store.add(segment(1, 5.0)).unwrap_err();
        assert_eq!(err, ClusterError::DuplicateId(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn edits_attributes_in_place() {
        let mut store = LineamentStore::new();
        let id = store.add(segment(1, 0.0)).unwrap();
        store.attributes_mut(id).unwrap().label = 4;
        assert_eq!(store.get(id).unwrap().label(), 4);
    }
}
