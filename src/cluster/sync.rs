//! Reconciles a finished run with the classification already in a store.
//!
//! Lineaments in the run's cluster, the initial seed included, receive the
//! run's label and bookkeeping. Lineaments that carried the same label before
//! but are outside the cluster this time are reset to unclassified, so the
//! latest run for a label fully replaces the previous one.

use std::collections::HashMap;

use super::engine::ClusterRun;
use crate::error::{ClusterError, Result};
use crate::lineament::{Attributes, LineamentId, LineamentStore};

/// Names of the persisted attribute fields, in [`FieldUpdate::values`] order.
pub const FIELD_NAMES: [&str; 7] = ["label", "order", "seed", "source", "length", "OE", "ON"];

/// New attribute values for one lineament.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldUpdate {
    /// Key of the lineament in the store.
    pub id: LineamentId,
    /// Global id of the lineament.
    pub fid: i64,
    /// Values to persist.
    pub attributes: Attributes,
}

impl FieldUpdate {
    /// Field values as written to a vector layer, paired with
    /// [`FIELD_NAMES`]. `seed` is 0/1 and a missing `source` is 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> [(&'static str, f64); 7] {
        let a = &self.attributes;
        [
            (FIELD_NAMES[0], a.label as f64),
            (FIELD_NAMES[1], f64::from(a.order)),
            (FIELD_NAMES[2], if a.seed { 1.0 } else { 0.0 }),
            (FIELD_NAMES[3], a.source.unwrap_or(0) as f64),
            (FIELD_NAMES[4], a.length),
            (FIELD_NAMES[5], a.oe),
            (FIELD_NAMES[6], a.on),
        ]
    }

    /// Returns `true` if this update resets the lineament to unclassified.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.attributes == Attributes::cleared()
    }
}

/// Counts of a synchronisation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Lineaments that received the run's label.
    pub assigned: usize,
    /// Lineaments whose previous classification with this label was removed.
    pub cleared: usize,
}

/// Writes a [`ClusterRun`] back into lineament attributes.
pub struct ResultSync<'a> {
    run: &'a ClusterRun,
}

impl<'a> ResultSync<'a> {
    /// Creates a new synchronisation for `run`.
    #[must_use]
    pub fn new(run: &'a ClusterRun) -> Self {
        Self { run }
    }

    /// Computes the updates for every lineament the run touches, in store
    /// order, without modifying the store.
    #[must_use]
    pub fn updates(&self, store: &LineamentStore) -> Vec<FieldUpdate> {
        let working_set = self.run.working_set();
        let outcome = self.run.outcome();
        let label = self.run.label();

        let index: HashMap<LineamentId, usize> = working_set
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();

        store
            .iter()
            .filter_map(|(id, lineament)| {
                let assigned = index
                    .get(&id)
                    .and_then(|&i| outcome.records[i].map(|a| (i, a)));

                let attributes = match assigned {
                    Some((i, a)) => Attributes {
                        label,
                        order: a.order,
                        seed: outcome.used.contains(i),
                        source: a.source.and_then(|s| working_set.get(s)).map(|e| e.fid),
                        length: lineament.length,
                        oe: lineament.orientation.oe,
                        on: lineament.orientation.on,
                    },
                    None if lineament.label() == label => Attributes::cleared(),
                    None => return None,
                };

                Some(FieldUpdate {
                    id,
                    fid: lineament.fid,
                    attributes,
                })
            })
            .collect()
    }

    /// Applies the updates to the store.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::UnknownLineament`] if an update refers to a
    /// lineament that is no longer stored.
    pub fn execute(&self, store: &mut LineamentStore) -> Result<SyncReport> {
        let updates = self.updates(store);
        let mut report = SyncReport::default();

        for update in &updates {
            let attributes = store
                .attributes_mut(update.id)
                .ok_or(ClusterError::UnknownLineament(update.fid))?;
            *attributes = update.attributes;
            if update.is_cleared() {
                report.cleared += 1;
            } else {
                report.assigned += 1;
            }
        }

        tracing::info!(
            label = self.run.label(),
            assigned = report.assigned,
            cleared = report.cleared,
            "classification updated"
        );
        Ok(report)
    }

    /// Classification of every lineament with `label` blanked to 0, i.e. what
    /// remains of the layer once a run for `label` discards its predecessor.
    #[must_use]
    pub fn superseded_classification(store: &LineamentStore, label: i64) -> Vec<(i64, i64)> {
        store
            .iter()
            .map(|(_, l)| {
                let current = l.label();
                (l.fid, if current == label { 0 } else { current })
            })
            .collect()
    }
}
