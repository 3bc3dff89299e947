//! Goal-seeking heuristics that bias rollouts toward progress.

use rand::Rng;

use crate::{Action, Cell, Direction, WorldState};

/// Starting weight multiplier; halved once per clear axis.
const BASE_MULTIPLIER: f64 = 10.0;

impl WorldState {
    /// Pick the most promising goal.
    ///
    /// Each goal is weighted by
    /// `distance * (vertical_blockers + 1) * (horizontal_blockers + 1) * multiplier`,
    /// where blockers are terrain or hazard cells strictly between the agent
    /// and the goal along the agent's column and row. The multiplier starts at
    /// 10 and is halved for each axis with no blockers. Lowest weight wins;
    /// ties keep the first goal in row-major order.
    pub fn best_goal(&self) -> Option<Cell> {
        let agent = self.agent();
        let mut best: Option<(f64, Cell)> = None;

        for &goal in self.layout().goal_cells() {
            let vertical = self.vertical_blockers(goal);
            let horizontal = self.horizontal_blockers(goal);

            let mut multiplier = BASE_MULTIPLIER;
            if vertical == 0 {
                multiplier *= 0.5;
            }
            if horizontal == 0 {
                multiplier *= 0.5;
            }

            let weight = agent.distance(goal)
                * (vertical + 1) as f64
                * (horizontal + 1) as f64
                * multiplier;

            if best.map_or(true, |(w, _)| weight < w) {
                best = Some((weight, goal));
            }
        }

        best.map(|(_, goal)| goal)
    }

    /// Blocking cells in the agent's column between the agent row and the goal row.
    fn vertical_blockers(&self, goal: Cell) -> usize {
        let agent = self.agent();
        let (lo, hi) = ordered(agent.row, goal.row);
        ((lo + 1)..hi)
            .map(|row| self.blocking_layers(Cell::new(row, agent.col)))
            .sum()
    }

    /// Blocking cells in the agent's row between the agent column and the goal column.
    fn horizontal_blockers(&self, goal: Cell) -> usize {
        let agent = self.agent();
        let (lo, hi) = ordered(agent.col, goal.col);
        ((lo + 1)..hi)
            .map(|col| self.blocking_layers(Cell::new(agent.row, col)))
            .sum()
    }

    // Terrain and hazards are counted separately, so a cell marked as both counts twice.
    fn blocking_layers(&self, cell: Cell) -> usize {
        let layout = self.layout();
        usize::from(layout.terrain().get(cell)) + usize::from(layout.hazards().get(cell))
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// With the given probability, drop every action heading away from the best
/// goal's column. Does nothing when there is no goal or the agent already
/// shares its column.
pub(crate) fn bias_towards_goal<R: Rng + ?Sized>(
    state: &WorldState,
    actions: &mut Vec<Action>,
    probability: f64,
    rng: &mut R,
) {
    let Some(goal) = state.best_goal() else {
        return;
    };
    let col = state.agent().col;
    let away = if col > goal.col {
        Direction::Right
    } else if col < goal.col {
        Direction::Left
    } else {
        return;
    };

    if rng.gen::<f64>() < probability {
        actions.retain(|a| a.direction() != Some(away));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rules;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_best_goal_none_without_goals() {
        let state = WorldState::from_ascii("....\n.A..\n####\n").unwrap();
        assert_eq!(state.best_goal(), None);
    }

    #[test]
    fn test_best_goal_prefers_nearest_clear_path() {
        let level = "
..........
*...A...*.
##########
";
        // Left goal at distance 4, right goal at distance 4: tie keeps the first.
        let state = WorldState::from_ascii(level).unwrap();
        assert_eq!(state.best_goal(), Some(Cell::new(1, 0)));

        let level = "
..........
*....A..*.
##########
";
        let state = WorldState::from_ascii(level).unwrap();
        assert_eq!(state.best_goal(), Some(Cell::new(1, 8)));
    }

    #[test]
    fn test_best_goal_penalises_blockers() {
        let level = "
............
*.#.A.....*.
############
";
        // Left goal is closer (4 vs 6) but has a wall in the way:
        // left = 4 * 2 * 5 = 40, right = 6 * 1 * 2.5 = 15.
        let state = WorldState::from_ascii(level).unwrap();
        assert_eq!(state.best_goal(), Some(Cell::new(1, 10)));
    }

    #[test]
    fn test_best_goal_counts_hazards_vertically() {
        let level = "
.....*.....
...........
.....^.....
.....A.....
###########
....*......
";
        // Above: one hazard between, distance 3 -> 3 * 2 * 1 * 5 = 30.
        // Below-left goal: distance sqrt(5), floor in between -> ~22.4.
        let state = WorldState::from_ascii(level).unwrap();
        assert_eq!(state.best_goal(), Some(Cell::new(5, 4)));
    }

    #[test]
    fn test_bias_always_fires_at_probability_one() {
        let level = "
...........
...........
...........
...........
..A......*.
###########
";
        let state = WorldState::from_ascii(level).unwrap();
        let rules = Rules::default().with_direction_bias(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let actions = state.legal_actions(&rules, &mut rng);
        assert!(actions.iter().all(|a| a.direction() != Some(Direction::Left)));
        assert!(actions.contains(&Action::Right));
    }

    #[test]
    fn test_bias_never_fires_at_probability_zero() {
        let level = "
...........
...........
...........
...........
..A......*.
###########
";
        let state = WorldState::from_ascii(level).unwrap();
        let rules = Rules::default().with_direction_bias(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let actions = state.legal_actions(&rules, &mut rng);
        assert!(actions.contains(&Action::Left));
        assert!(actions.contains(&Action::JumpLeftSmall));
    }

    #[test]
    fn test_bias_can_empty_to_nothing() {
        let level = "
.........
.........
.........
.........
...#A#..*
#########
";
        // Walled in with jumping disabled: the bias has nothing left to drop.
        let state = WorldState::from_ascii(level).unwrap();
        let rules = Rules::default().with_direction_bias(1.0).without_jumping();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let actions = state.legal_actions(&rules, &mut rng);
        assert_eq!(actions, vec![Action::Nothing]);
    }
}
