//! Simulation policies for estimating a leaf's value.
//!
//! The `RolloutPolicy` trait lets the driver swap how a leaf is played out.
//! `RandomRollout` picks uniformly among the legal actions at every step;
//! any goal-directed pruning comes from the game's own `legal_actions`.

use rand::seq::SliceRandom;
use rand::Rng;
use tilebot_core::{Game, Outcome};

use crate::Result;

/// Strategy for playing a state out to a result.
pub trait RolloutPolicy<G: Game> {
    /// Play `state` forward and return the final outcome.
    ///
    /// Returns `Outcome::Ongoing` if the playout was cut short.
    fn simulate<R: Rng + ?Sized>(&self, game: &G, state: &G::State, rng: &mut R) -> Result<Outcome>;
}

/// Uniformly random playouts, capped at `max_depth` actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomRollout {
    max_depth: usize,
}

impl RandomRollout {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<G: Game> RolloutPolicy<G> for RandomRollout {
    fn simulate<R: Rng + ?Sized>(&self, game: &G, state: &G::State, rng: &mut R) -> Result<Outcome> {
        let mut state = state.clone();
        let mut depth = 0;

        loop {
            let outcome = game.outcome(&state);
            if outcome.is_terminal() || depth == self.max_depth {
                return Ok(outcome);
            }

            let actions = game.legal_actions(&state, rng);
            let Some(&action) = actions.choose(rng) else {
                return Ok(outcome);
            };
            state = game.apply(&state, action)?;
            depth += 1;
        }
    }
}
