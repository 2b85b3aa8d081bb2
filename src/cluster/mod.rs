//! Seed-based region growing over lineaments.
//!
//! A run filters the store into a [`WorkingSet`], grows a cluster from one
//! seed with [`ClusterEngine`], and hands the result to [`ResultSync`] to be
//! written back as classification attributes.

mod engine;
mod labelling;
mod neighbors;
mod sync;
mod working_set;

#[cfg(test)]
pub(crate) mod fixtures;

pub use engine::{Assignment, ClusterEngine, ClusterOutcome, ClusterRun, Clustre, EngineState};
pub use labelling::{propagate, Propagation, Thresholds};
pub use neighbors::{GridIndex, LinearScan, NeighborSearch, Neighborhood};
pub use sync::{FieldUpdate, ResultSync, SyncReport, FIELD_NAMES};
pub use working_set::{UsedSeeds, WorkingEntry, WorkingSet};
