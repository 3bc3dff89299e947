//! Root-parallel search.
//!
//! Every worker gets its own copy of the root tree and its own RNG, grows it
//! without any shared mutable state, and hands the tree back. The trees are
//! then merged into the root with [`merge_worker_trees`] and the decision is
//! read off the merged first level with exploration switched off.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tilebot_core::Game;
use tracing::{debug, info};

use crate::{
    config::SearchConfig,
    merge::merge_worker_trees,
    node::{NodeId, NodeStats},
    rollout::{RandomRollout, RolloutPolicy},
    search::Mcts,
    tree::SearchTree,
    Result, SearchError,
};

/// Statistics for one first-level branch of the merged tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildSummary<A> {
    pub action: A,
    pub visits: u32,
    pub wins: u32,
    pub losses: u32,
}

impl<A> ChildSummary<A> {
    /// Net result per visit; the quantity the final choice maximises.
    pub fn mean_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            (f64::from(self.wins) - f64::from(self.losses)) / f64::from(self.visits)
        }
    }
}

/// The chosen action plus the statistics it was chosen from.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision<A> {
    pub action: A,
    pub children: Vec<ChildSummary<A>>,
    pub root_visits: u32,
}

impl<A: Copy> Decision<A> {
    /// Pick the root child with the best net score (exploration 0).
    ///
    /// # Errors
    /// Returns `SearchError::NoChildren` if the root was never expanded.
    pub fn from_tree<G: Game<Action = A>>(tree: &SearchTree<G>) -> Result<Self> {
        let best = tree
            .select_child(NodeId::ROOT, 0.0)
            .ok_or(SearchError::NoChildren)?;
        let action = action_of(tree, best)?;

        let children = tree
            .root_child_stats()
            .map(|(id, stats)| summarize(tree, id, stats))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            action,
            children,
            root_visits: tree.root().stats.visits,
        })
    }
}

fn action_of<G: Game>(tree: &SearchTree<G>, id: NodeId) -> Result<G::Action> {
    // Only the root lacks an action.
    tree.get(id).action.ok_or(SearchError::NoChildren)
}

fn summarize<G: Game>(
    tree: &SearchTree<G>,
    id: NodeId,
    stats: &NodeStats,
) -> Result<ChildSummary<G::Action>> {
    Ok(ChildSummary {
        action: action_of(tree, id)?,
        visits: stats.visits,
        wins: stats.wins,
        losses: stats.losses,
    })
}

/// Root-parallel MCTS over a fixed-size rayon pool.
#[derive(Clone, Debug)]
pub struct ParallelSearch<G: Game, P = RandomRollout> {
    game: G,
    config: SearchConfig,
    rollout: P,
}

impl<G: Game> ParallelSearch<G, RandomRollout> {
    /// Search with uniformly random rollouts capped at the configured depth.
    pub fn new(game: G, config: SearchConfig) -> Self {
        let rollout = RandomRollout::new(config.max_rollout_depth);
        Self::with_rollout(game, config, rollout)
    }
}

impl<G, P> ParallelSearch<G, P>
where
    G: Game,
    P: RolloutPolicy<G> + Clone + Send + Sync,
{
    pub fn with_rollout(game: G, config: SearchConfig, rollout: P) -> Self {
        Self {
            game,
            config,
            rollout,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Choose an action for `root`.
    ///
    /// # Errors
    /// - `SearchError::InvalidConfig` for a bad configuration
    /// - `SearchError::TerminalRoot` if `root` is already won or lost
    /// - `SearchError::ThreadPool` if the worker pool cannot be built
    /// - the first error any worker hit
    pub fn decide(&self, root: &G::State) -> Result<Decision<G::Action>> {
        let outcome = self.game.outcome(root);
        if outcome.is_terminal() {
            return Err(SearchError::TerminalRoot(outcome));
        }

        let tree = self.search(root)?;
        let decision = Decision::from_tree(&tree)?;
        info!(
            action = ?decision.action,
            root_visits = decision.root_visits,
            branches = decision.children.len(),
            "decision made"
        );
        Ok(decision)
    }

    /// Grow one tree per worker and return them merged into a fresh root.
    pub fn search(&self, root: &G::State) -> Result<SearchTree<G>> {
        self.config.validate()?;

        let mut root_rng = self.rng_for(self.config.root_seed());
        let root_tree = SearchTree::new(&self.game, root.clone(), &mut root_rng);
        let workers = self.run_workers(&root_tree)?;

        let mut merged = root_tree;
        merge_worker_trees(&self.game, &mut merged, &workers);
        debug!(
            workers = workers.len(),
            nodes = merged.len(),
            root_visits = merged.root().stats.visits,
            "merged worker trees"
        );
        Ok(merged)
    }

    /// Run every worker on its own copy of `root_tree`.
    ///
    /// A panicking worker propagates out of the pool to the caller.
    pub fn run_workers(&self, root_tree: &SearchTree<G>) -> Result<Vec<SearchTree<G>>> {
        let worker_count = self.config.worker_count;
        let iterations = self.config.iterations_per_worker;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("tilebot-worker-{i}"))
            .build()?;

        let results: Vec<Result<SearchTree<G>>> = pool.install(|| {
            (0..worker_count)
                .into_par_iter()
                .map(|index| -> Result<SearchTree<G>> {
                    let rng = self.rng_for(self.config.worker_seed(index));
                    let mut mcts = Mcts::new(
                        self.game.clone(),
                        self.config.clone(),
                        self.rollout.clone(),
                        rng,
                    );
                    let mut tree = root_tree.clone();
                    mcts.run_iterations(&mut tree, iterations)?;
                    debug!(
                        worker = index,
                        nodes = tree.len(),
                        depth = tree.depth(),
                        "worker finished"
                    );
                    Ok(tree)
                })
                .collect()
        });

        results.into_iter().collect()
    }

    fn rng_for(&self, seed: Option<u64>) -> ChaCha8Rng {
        match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
