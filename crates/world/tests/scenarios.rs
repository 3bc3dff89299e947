//! Hand-built levels exercising the movement rules end to end.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilebot_core::Outcome;
use tilebot_world::{Action, Cell, Grid, Rules, WorldState};

fn legal(state: &WorldState, rules: &Rules) -> Vec<Action> {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    state.legal_actions(rules, &mut rng)
}

#[test]
fn test_agent_at_column_zero_has_no_left_moves() {
    let level = "
..........
..........
..........
..........
A.........
##########
";
    let state = WorldState::from_ascii(level).unwrap();
    let actions = legal(&state, &Rules::default());
    for action in [Action::Left, Action::JumpLeftSmall, Action::JumpLeftBig] {
        assert!(!actions.contains(&action), "{} should be filtered", action);
    }
    assert!(actions.contains(&Action::Right));
    assert!(actions.contains(&Action::JumpRightBig));
}

#[test]
fn test_airborne_lands_on_nearer_surface() {
    // Destination column has terrain two and four rows below the agent.
    let level = "
........
..A.....
........
...#....
........
...#....
........
........
";
    let state = WorldState::from_ascii(level).unwrap();
    let actions = legal(&state, &Rules::default());
    assert_eq!(actions, vec![Action::Left, Action::Right]);

    let next = state.apply(Action::Right).unwrap();
    assert_eq!(next.agent(), Cell::new(2, 3));
    assert_eq!(next.outcome(), Outcome::Ongoing);
}

#[test]
fn test_big_jump_clears_floor_pit() {
    let level = "
..........
..........
..........
..........
..A.......
###^^#*###
";
    let state = WorldState::from_ascii(level).unwrap();
    let actions = legal(&state, &Rules::default());
    assert!(actions.contains(&Action::JumpRightBig));
    assert!(actions.contains(&Action::JumpRightSmall));

    assert_eq!(state.apply(Action::Right).unwrap().outcome(), Outcome::Loss);
    assert_eq!(state.apply(Action::JumpRightSmall).unwrap().outcome(), Outcome::Loss);
    assert_eq!(state.apply(Action::JumpRightBig).unwrap().outcome(), Outcome::Win);
}

#[test]
fn test_jump_falls_onto_goal_below_apex() {
    let level = "
..........
..........
..........
......*...
..A.......
##########
";
    let state = WorldState::from_ascii(level).unwrap();
    let next = state.apply(Action::JumpRightBig).unwrap();
    // Apex is row 2, column 6; the goal at row 3 catches the fall.
    assert_eq!(next.agent(), Cell::new(2, 6));
    assert_eq!(next.outcome(), Outcome::Win);
}

#[test]
fn test_walking_off_ledge_is_fatal() {
    let level = "
.......
.......
.......
..A....
..#....
.......
";
    let state = WorldState::from_ascii(level).unwrap();
    let next = state.apply(Action::Left).unwrap();
    assert_eq!(next.agent(), Cell::new(5, 1));
    assert_eq!(next.outcome(), Outcome::Loss);
}

#[test]
fn test_reference_size_grid() {
    let mut terrain = Grid::new(32, 32).unwrap();
    for col in 0..32 {
        terrain.set(Cell::new(31, col), true).unwrap();
    }
    let hazards = Grid::new(32, 32).unwrap();
    let mut goals = Grid::new(32, 32).unwrap();
    goals.set(Cell::new(30, 20), true).unwrap();
    let mut agent = Grid::new(32, 32).unwrap();
    agent.set(Cell::new(30, 29), true).unwrap();

    let state = WorldState::from_grids(terrain, hazards, goals, &agent).unwrap();
    let actions = legal(&state, &Rules::default());
    // Two columns remain to the right: small jump right stays, big jump right goes.
    assert!(actions.contains(&Action::JumpRightSmall));
    assert!(!actions.contains(&Action::JumpRightBig));
    assert!(actions.contains(&Action::Right));
    assert_eq!(state.best_goal(), Some(Cell::new(30, 20)));
}
