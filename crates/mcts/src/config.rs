//! Search configuration parameters.
//!
//! Defaults reproduce the planner's stock settings: eight workers running
//! twenty-five iterations each, with a small exploration constant.

use crate::{Result, SearchError};

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Number of independent trees grown in parallel.
    pub worker_count: usize,

    /// Select/expand/simulate/backpropagate cycles per worker.
    pub iterations_per_worker: usize,

    /// UCB1 exploration constant used while descending the tree.
    /// The final decision always uses 0 (pure exploitation).
    pub exploration_constant: f64,

    /// Rollouts still running after this many actions count as `Ongoing`.
    pub max_rollout_depth: usize,

    /// Base seed. Worker `i` is seeded with `seed + i`; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            worker_count: 8,
            iterations_per_worker: 25,
            exploration_constant: 0.1,
            max_rollout_depth: 1000,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Create a config with the given parallelism and per-worker budget.
    pub fn new(worker_count: usize, iterations_per_worker: usize) -> Self {
        Self {
            worker_count,
            iterations_per_worker,
            ..Default::default()
        }
    }

    /// Small, seeded configuration for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            worker_count: 2,
            iterations_per_worker: 50,
            max_rollout_depth: 200,
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_exploration(mut self, exploration_constant: f64) -> Self {
        self.exploration_constant = exploration_constant;
        self
    }

    pub fn with_max_rollout_depth(mut self, max_rollout_depth: usize) -> Self {
        self.max_rollout_depth = max_rollout_depth;
        self
    }

    /// Seed for worker `index`, if the search is seeded.
    pub fn worker_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(index as u64))
    }

    /// Seed for the shared root tree, one past the last worker's seed.
    pub fn root_seed(&self) -> Option<u64> {
        self.worker_seed(self.worker_count)
    }

    /// # Errors
    /// Returns `SearchError::InvalidConfig` for zero workers, iterations or
    /// rollout depth, and for a negative or non-finite exploration constant.
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(SearchError::InvalidConfig("worker_count must be positive".into()));
        }
        if self.iterations_per_worker == 0 {
            return Err(SearchError::InvalidConfig(
                "iterations_per_worker must be positive".into(),
            ));
        }
        if self.max_rollout_depth == 0 {
            return Err(SearchError::InvalidConfig(
                "max_rollout_depth must be positive".into(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
