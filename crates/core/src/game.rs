use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;

use crate::{Outcome, Result};

/// A single-agent environment the planner can search over.
///
/// States are immutable snapshots: `apply` derives a new state and never
/// mutates its input, so one state can be shared by many search nodes and
/// worker threads at once.
pub trait Game: Clone + Send + Sync {
    /// A world snapshot (e.g., the tile grids plus agent position)
    type State: Clone + Debug + Send + Sync;

    /// A discrete action the agent can take
    type Action: Clone + Copy + Debug + Send + Sync + Eq + Hash;

    /// Identity used to recognise equivalent children when merging trees
    type Key: Clone + Debug + Eq + Send + Sync;

    /// Returns the actions available from `state`. Never empty.
    ///
    /// Takes an RNG because action generation may apply stochastic
    /// rollout heuristics.
    fn legal_actions<R: Rng + ?Sized>(&self, state: &Self::State, rng: &mut R) -> Vec<Self::Action>;

    /// Applies an action, returning a new state (immutable operation)
    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State>;

    /// Returns the outcome of `state` from the agent's perspective.
    fn outcome(&self, state: &Self::State) -> Outcome;

    /// Returns true if the episode has ended in a win or a loss
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.outcome(state).is_terminal()
    }

    /// Returns the key identifying `state` for tree merging
    fn merge_key(&self, state: &Self::State) -> Self::Key;
}
