use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::labelling::{propagate, Thresholds};
use super::neighbors::{GridIndex, LinearScan, NeighborSearch};
use super::working_set::{UsedSeeds, WorkingSet};
use crate::config::{ClusterParams, SearchStrategy, MIN_LINEAMENTS_FOR_INDEX};
use crate::error::{ClusterError, Result};
use crate::lineament::LineamentStore;

/// Lifecycle of a [`ClusterEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No seed has been resolved yet.
    Idle,
    /// Seeds remain in the queue.
    Propagating,
    /// The queue is exhausted.
    Done,
}

/// How a working index joined the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Generation in which the index was recruited, starting at 1. The
    /// initial seed is generation 0.
    pub order: u32,
    /// Working index of the seed that recruited it, `None` for the initial
    /// seed.
    pub source: Option<usize>,
}

/// Working-index results of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    /// Working index of the initial seed.
    pub seed: usize,
    /// Assigned working indices, in first-discovery order, without repeats.
    /// The initial seed comes first.
    pub assigned: Vec<usize>,
    /// One slot per working index, filled for assigned indices.
    pub records: Vec<Option<Assignment>>,
    /// Indices expanded as seeds.
    pub used: UsedSeeds,
    /// Number of seeds expanded.
    pub steps: usize,
}

/// Queue-driven region growing over a working set.
///
/// Each [`step`](Self::step) pops one seed, marks it used, labels its similar
/// neighbours and appends up to two new seeds that are neither used nor
/// already queued. Every expanded seed is a distinct working index, so a run
/// takes at most `working_set.len()` steps.
pub struct ClusterEngine<'a> {
    working_set: &'a WorkingSet,
    search: Box<dyn NeighborSearch + 'a>,
    thresholds: Thresholds,
    state: EngineState,
    seed: usize,
    queue: VecDeque<usize>,
    used: UsedSeeds,
    records: Vec<Option<Assignment>>,
    assigned: Vec<usize>,
    generation: u32,
    steps: usize,
}

impl<'a> ClusterEngine<'a> {
    /// Creates an idle engine over `working_set`.
    #[must_use]
    pub fn new(
        working_set: &'a WorkingSet,
        search: Box<dyn NeighborSearch + 'a>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            working_set,
            search,
            thresholds,
            state: EngineState::Idle,
            seed: 0,
            queue: VecDeque::new(),
            used: UsedSeeds::with_len(working_set.len()),
            records: vec![None; working_set.len()],
            assigned: Vec::new(),
            generation: 1,
            steps: 0,
        }
    }

    /// Resolves the initial seed and starts propagation.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::SeedInvalid`] if `seed_id` is not part of the
    /// working set, because it does not exist or already carries another
    /// label.
    pub fn start(&mut self, seed_id: i64) -> std::result::Result<(), ClusterError> {
        let seed = self
            .working_set
            .index_of(seed_id)
            .ok_or(ClusterError::SeedInvalid {
                seed_id,
                label: self.working_set.label(),
            })?;

        self.seed = seed;
        self.queue.clear();
        self.queue.push_back(seed);
        self.used = UsedSeeds::with_len(self.working_set.len());
        self.records = vec![None; self.working_set.len()];
        self.records[seed] = Some(Assignment {
            order: 0,
            source: None,
        });
        self.assigned.clear();
        self.assigned.push(seed);
        self.generation = 1;
        self.steps = 0;
        self.state = EngineState::Propagating;
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Seeds waiting to be expanded, front first.
    #[must_use]
    pub fn queued(&self) -> Vec<usize> {
        self.queue.iter().copied().collect()
    }

    /// Expands the seed at the front of the queue.
    pub fn step(&mut self) -> EngineState {
        if self.state != EngineState::Propagating {
            return self.state;
        }

        if self.steps >= self.working_set.len() {
            warn!(
                steps = self.steps,
                queued = self.queue.len(),
                "iteration cap reached, stopping propagation"
            );
            self.queue.clear();
        }

        let Some(seed) = self.queue.pop_front() else {
            self.state = EngineState::Done;
            return self.state;
        };

        self.used.insert(seed);
        let neighborhood = self
            .search
            .within(seed, self.thresholds.distance, &self.used);
        let propagation = propagate(self.working_set, seed, &neighborhood, &self.thresholds);

        for &i in &propagation.accepted {
            if self.records[i].is_none() {
                self.records[i] = Some(Assignment {
                    order: self.generation,
                    source: Some(seed),
                });
                self.assigned.push(i);
            }
        }

        debug!(
            seed,
            generation = self.generation,
            candidates = neighborhood.len(),
            accepted = propagation.accepted.len(),
            new_seed = ?propagation.new_seed,
            new_seed2 = ?propagation.new_seed2,
            "expanded seed"
        );

        self.generation += 1;
        self.steps += 1;

        for next in [propagation.new_seed, propagation.new_seed2]
            .into_iter()
            .flatten()
        {
            if !self.used.contains(next) && !self.queue.contains(&next) {
                self.queue.push_back(next);
            }
        }

        if self.queue.is_empty() {
            self.state = EngineState::Done;
        }
        self.state
    }

    /// Steps until the queue is exhausted and returns the results.
    #[must_use]
    pub fn run(mut self) -> ClusterOutcome {
        while self.step() == EngineState::Propagating {}
        ClusterOutcome {
            seed: self.seed,
            assigned: self.assigned,
            records: self.records,
            used: self.used,
            steps: self.steps,
        }
    }
}

/// Results of a clustering run, addressable by working index or global id.
#[derive(Debug, Clone)]
pub struct ClusterRun {
    label: i64,
    working_set: WorkingSet,
    outcome: ClusterOutcome,
}

impl ClusterRun {
    /// Label the run assigned.
    #[must_use]
    pub fn label(&self) -> i64 {
        self.label
    }

    /// Working set the run operated on.
    #[must_use]
    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    /// Working-index results.
    #[must_use]
    pub fn outcome(&self) -> &ClusterOutcome {
        &self.outcome
    }

    /// Global id of the initial seed.
    #[must_use]
    pub fn seed_id(&self) -> Option<i64> {
        self.fid(self.outcome.seed)
    }

    /// Global ids of the assigned lineaments, in first-discovery order.
    #[must_use]
    pub fn assigned_ids(&self) -> Vec<i64> {
        self.outcome
            .assigned
            .iter()
            .filter_map(|&i| self.fid(i))
            .collect()
    }

    /// Generation per working index, 0 for the initial seed and for
    /// unassigned indices.
    #[must_use]
    pub fn orders(&self) -> Vec<u32> {
        self.outcome
            .records
            .iter()
            .map(|r| r.map_or(0, |a| a.order))
            .collect()
    }

    /// Global id of the recruiting seed per working index.
    #[must_use]
    pub fn sources(&self) -> Vec<Option<i64>> {
        self.outcome
            .records
            .iter()
            .map(|r| r.and_then(|a| a.source).and_then(|s| self.fid(s)))
            .collect()
    }

    /// Whether each working index was expanded as a seed.
    #[must_use]
    pub fn seed_flags(&self) -> &[bool] {
        self.outcome.used.as_flags()
    }

    /// Assignment of the lineament with global id `fid`, if it belongs to the
    /// cluster.
    #[must_use]
    pub fn assignment_of(&self, fid: i64) -> Option<Assignment> {
        self.working_set
            .index_of(fid)
            .and_then(|i| self.outcome.records[i])
    }

    fn fid(&self, index: usize) -> Option<i64> {
        self.working_set.get(index).map(|e| e.fid)
    }
}

/// Runs one clustering pass over a lineament store.
///
/// Builds the working set for the target label, selects the neighbour search
/// backend and grows the cluster from the configured seed.
#[derive(Debug, Clone)]
pub struct Clustre {
    params: ClusterParams,
}

impl Clustre {
    /// Creates a new clustering operation.
    #[must_use]
    pub fn new(params: ClusterParams) -> Self {
        Self { params }
    }

    /// Parameters of the operation.
    #[must_use]
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Executes the run. The store is not modified; pass the returned run to
    /// [`ResultSync`](super::ResultSync) to persist it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the parameters are invalid and
    /// [`ClusterError::SeedInvalid`] if the seed is not eligible.
    pub fn execute(&self, store: &LineamentStore) -> Result<ClusterRun> {
        self.params.validate()?;

        let working_set = WorkingSet::from_store(store, self.params.label);
        let thresholds = Thresholds::from(&self.params);

        let outcome = {
            let search = self.search_for(&working_set);
            let mut engine = ClusterEngine::new(&working_set, search, thresholds);
            engine.start(self.params.seed_id)?;
            engine.run()
        };

        info!(
            label = self.params.label,
            seed_id = self.params.seed_id,
            working_set = working_set.len(),
            assigned = outcome.assigned.len(),
            steps = outcome.steps,
            "clustering finished"
        );

        Ok(ClusterRun {
            label: self.params.label,
            working_set,
            outcome,
        })
    }

    fn search_for<'a>(&self, working_set: &'a WorkingSet) -> Box<dyn NeighborSearch + 'a> {
        let grid = |cell_size: Option<f64>| -> Box<dyn NeighborSearch + 'a> {
            Box::new(GridIndex::new(
                working_set,
                cell_size.unwrap_or(self.params.th_distance),
            ))
        };
        match self.params.search {
            SearchStrategy::Linear => Box::new(LinearScan::new(working_set)),
            SearchStrategy::Grid { cell_size } => grid(cell_size),
            SearchStrategy::Auto if working_set.len() >= MIN_LINEAMENTS_FOR_INDEX => grid(None),
            SearchStrategy::Auto => Box::new(LinearScan::new(working_set)),
        }
    }
}
