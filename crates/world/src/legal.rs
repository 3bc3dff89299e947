//! Legal action generation for the tile world.
//!
//! Candidates start from the full move list and pass through a fixed filter
//! pipeline. Each stage only removes actions, so anything dropped early
//! stays dropped:
//!
//! 1. grid boundaries
//! 2. hazard clearance along jump arcs
//! 3. collisions with adjacent terrain, and ground contact for jumps
//! 4. optional goal-direction bias
//!
//! An empty result degrades to `[NOTHING]`.

use rand::Rng;

use crate::{heuristics, Action, Cell, Rules, WorldState};

/// Jumps need this many rows above the agent to arc upward.
const JUMP_HEADROOM: usize = 3;

impl WorldState {
    /// Actions available from the current agent position. Never empty.
    pub fn legal_actions<R: Rng + ?Sized>(&self, rules: &Rules, rng: &mut R) -> Vec<Action> {
        let mut actions = if rules.jumping_disabled {
            Action::LATERAL.to_vec()
        } else {
            Action::MOVES.to_vec()
        };

        self.filter_grid_bounds(&mut actions);
        self.filter_hazard_clearance(&mut actions);
        self.filter_collisions(&mut actions);

        if rules.weighted_direction_bias {
            heuristics::bias_towards_goal(self, &mut actions, rules.direction_bias_probability, rng);
        }

        if actions.is_empty() {
            actions.push(Action::Nothing);
        }
        actions
    }

    fn filter_grid_bounds(&self, actions: &mut Vec<Action>) {
        let Cell { row, col } = self.agent();
        let width = self.width();

        actions.retain(|&action| {
            if action.is_jump() && row < JUMP_HEADROOM {
                return false;
            }
            match action {
                Action::Left => col > 0,
                Action::Right => col + 1 < width,
                Action::JumpLeftSmall | Action::JumpLeftBig => {
                    col >= action.jump().map_or(0, |j| j.reach())
                }
                Action::JumpRightSmall | Action::JumpRightBig => {
                    col + action.jump().map_or(0, |j| j.reach()) < width
                }
                Action::Nothing => true,
            }
        });
    }

    /// Drop jumps whose arc sweeps a hazard: any hazard in the footprint
    /// columns, from the launch row up to the jump's clearance.
    fn filter_hazard_clearance(&self, actions: &mut Vec<Action>) {
        let agent = self.agent();
        let hazards = self.layout().hazard_cells();
        if hazards.is_empty() {
            return;
        }

        actions.retain(|&action| {
            let (Some(size), Some(dir)) = (action.jump(), action.direction()) else {
                return true;
            };
            !hazards.iter().any(|hazard| {
                let rows_above = agent.row as isize - hazard.row as isize;
                if !(0..=size.clearance() as isize).contains(&rows_above) {
                    return false;
                }
                (0..=size.hazard_span() as isize)
                    .any(|step| hazard.col as isize == agent.col as isize + dir.sign() * step)
            })
        });
    }

    fn filter_collisions(&self, actions: &mut Vec<Action>) {
        let Cell { row, col } = self.agent();
        let (row, col) = (row as isize, col as isize);
        let terrain = self.layout().terrain();

        let blocked_left = terrain.get_signed(row, col - 1);
        let blocked_right = terrain.get_signed(row, col + 1);
        let blocked_above = terrain.get_signed(row - 1, col);
        let grounded = terrain.get_signed(row + 1, col);

        actions.retain(|&action| match action {
            Action::Left => !blocked_left,
            Action::Right => !blocked_right,
            a if a.is_jump() => grounded && !blocked_above,
            _ => true,
        });
    }
}
