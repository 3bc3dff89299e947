//! Implementation of the Game trait for the tile world.

use rand::Rng;
use tilebot_core::{Game, Outcome, Result};

use crate::{Action, Cell, Rules, WorldState};

/// The tile world under a fixed set of movement rules.
#[derive(Clone, Debug, Default)]
pub struct TileWorld {
    rules: Rules,
}

impl TileWorld {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

impl Game for TileWorld {
    type State = WorldState;
    type Action = Action;
    // Only the agent moves, so its cell identifies a state within one search.
    type Key = Cell;

    fn legal_actions<R: Rng + ?Sized>(&self, state: &WorldState, rng: &mut R) -> Vec<Action> {
        state.legal_actions(&self.rules, rng)
    }

    fn apply(&self, state: &WorldState, action: Action) -> Result<WorldState> {
        state.apply(action)
    }

    fn outcome(&self, state: &WorldState) -> Outcome {
        state.outcome()
    }

    fn merge_key(&self, state: &WorldState) -> Cell {
        state.agent()
    }
}
