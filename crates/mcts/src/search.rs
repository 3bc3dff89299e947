//! Single-tree Monte Carlo Tree Search driver.
//!
//! One iteration runs the classic four phases on a tree:
//! select (UCB1 descent) → expand (one untried action) → simulate
//! (rollout policy) → backpropagate (visit and win/loss tallies).

use rand::Rng;
use tilebot_core::{Game, Outcome};
use tracing::trace;

use crate::{
    config::SearchConfig,
    node::NodeId,
    rollout::RolloutPolicy,
    tree::SearchTree,
    Result, SearchError,
};

/// Monte Carlo Tree Search over one tree.
///
/// Generic over:
/// - `G`: The game being searched
/// - `P`: The rollout policy used to score leaves
/// - `R`: The random number generator
pub struct Mcts<G: Game, P: RolloutPolicy<G>, R: Rng> {
    game: G,
    config: SearchConfig,
    rollout: P,
    rng: R,
}

impl<G, P, R> Mcts<G, P, R>
where
    G: Game,
    P: RolloutPolicy<G>,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(game: G, config: SearchConfig, rollout: P, rng: R) -> Self {
        Self {
            game,
            config,
            rollout,
            rng,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Fresh single-node tree rooted at `state`.
    pub fn new_tree(&mut self, state: G::State) -> SearchTree<G> {
        SearchTree::new(&self.game, state, &mut self.rng)
    }

    /// Build a tree for `state` and run the configured iteration budget on it.
    pub fn search(&mut self, state: G::State) -> Result<SearchTree<G>> {
        let mut tree = self.new_tree(state);
        self.run_iterations(&mut tree, self.config.iterations_per_worker)?;
        Ok(tree)
    }

    /// Run `count` select → expand → simulate → backpropagate cycles.
    pub fn run_iterations(&mut self, tree: &mut SearchTree<G>, count: usize) -> Result<()> {
        for iteration in 0..count {
            let (leaf, outcome) = self.iterate(tree)?;
            trace!(iteration, leaf = leaf.index(), %outcome, "iteration complete");
        }
        Ok(())
    }

    /// One full iteration. Returns the simulated node and its result.
    pub fn iterate(&mut self, tree: &mut SearchTree<G>) -> Result<(NodeId, Outcome)> {
        let leaf = self.tree_policy(tree)?;
        let outcome = self
            .rollout
            .simulate(&self.game, &tree.get(leaf).state, &mut self.rng)?;
        tree.backpropagate(leaf, outcome);
        Ok((leaf, outcome))
    }

    /// Descend from the root until a node can be expanded or is terminal.
    ///
    /// Returns the freshly expanded child, or the terminal node reached.
    pub fn tree_policy(&mut self, tree: &mut SearchTree<G>) -> Result<NodeId> {
        let mut current = NodeId::ROOT;
        loop {
            let node = tree.get(current);
            if node.is_terminal() {
                return Ok(current);
            }
            if !node.is_fully_expanded() {
                return self.expand(tree, current);
            }
            current = tree
                .select_child(current, self.config.exploration_constant)
                .ok_or(SearchError::NoChildren)?;
        }
    }

    /// Expand the last untried action of `id` into a new child.
    ///
    /// # Errors
    /// - `SearchError::NothingToExpand` if `id` is fully expanded
    /// - `SearchError::Game` if applying the action fails
    pub fn expand(&mut self, tree: &mut SearchTree<G>, id: NodeId) -> Result<NodeId> {
        let action = tree
            .get_mut(id)
            .untried
            .pop()
            .ok_or(SearchError::NothingToExpand(id))?;
        tree.add_child(&self.game, id, action, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::RandomRollout;
    use crate::testing::{Corridor, Step};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mcts(seed: u64) -> Mcts<Corridor, RandomRollout, ChaCha8Rng> {
        let config = SearchConfig::for_testing(seed);
        let rollout = RandomRollout::new(config.max_rollout_depth);
        Mcts::new(Corridor { goal: 3 }, config, rollout, ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_expand_pops_from_end() {
        let mut mcts = mcts(1);
        let mut tree = mcts.new_tree(0);

        let first = mcts.expand(&mut tree, NodeId::ROOT).unwrap();
        assert_eq!(tree.get(first).action, Some(Step::Forward));
        let second = mcts.expand(&mut tree, NodeId::ROOT).unwrap();
        assert_eq!(tree.get(second).action, Some(Step::Back));

        assert!(tree.root().is_fully_expanded());
        assert!(matches!(
            mcts.expand(&mut tree, NodeId::ROOT),
            Err(SearchError::NothingToExpand(NodeId::ROOT))
        ));
    }

    #[test]
    fn test_tree_policy_expands_root_first() {
        let mut mcts = mcts(2);
        let mut tree = mcts.new_tree(0);
        let leaf = mcts.tree_policy(&mut tree).unwrap();
        assert_eq!(tree.get(leaf).parent, Some(NodeId::ROOT));
    }

    #[test]
    fn test_tree_policy_stops_at_terminal_root() {
        let mut mcts = mcts(3);
        let mut tree = mcts.new_tree(3);
        assert_eq!(mcts.tree_policy(&mut tree).unwrap(), NodeId::ROOT);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_visit_counts_match_iterations() {
        let mut mcts = mcts(4);
        let tree = mcts.search(0).unwrap();

        assert_eq!(tree.root().stats.visits, 50);
        // One node per iteration until terminal nodes start absorbing visits.
        assert!(tree.len() <= 51);

        let child_visits: u32 = tree.root_child_stats().map(|(_, s)| s.visits).sum();
        assert_eq!(child_visits, 50);
    }

    #[test]
    fn test_every_visited_tally_is_consistent() {
        let mut mcts = mcts(5);
        let tree = mcts.search(0).unwrap();
        for index in 0..tree.len() {
            let stats = tree.get(NodeId(index)).stats;
            assert!(stats.wins + stats.losses <= stats.visits);
            assert!(stats.visits >= 1, "node {} never simulated", index);
        }
    }

    #[test]
    fn test_forward_is_preferred() {
        let mut mcts = Mcts::new(
            Corridor { goal: 2 },
            SearchConfig::new(1, 200).with_seed(6),
            RandomRollout::new(100),
            ChaCha8Rng::seed_from_u64(6),
        );
        let tree = mcts.search(0).unwrap();
        let best = tree.select_child(NodeId::ROOT, 0.0).unwrap();
        assert_eq!(tree.get(best).action, Some(Step::Forward));
    }

    #[test]
    fn test_search_deterministic() {
        let run = |seed| {
            let tree = mcts(seed).search(0).unwrap();
            tree.root_child_stats().map(|(_, s)| *s).collect::<Vec<_>>()
        };
        assert_eq!(run(12345), run(12345));
    }
}
