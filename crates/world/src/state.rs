//! Immutable world snapshot: static tile layout plus the agent position.

use std::fmt;
use std::sync::Arc;

use tilebot_core::{Outcome, PlannerError, Result};

use crate::{Action, Cell, Grid};

/// The static part of a level. Shared by every state derived from one root.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Layout {
    terrain: Grid,
    hazards: Grid,
    goals: Grid,
    // Row-major cell lists, cached for the filters that scan every hazard or goal.
    hazard_cells: Vec<Cell>,
    goal_cells: Vec<Cell>,
}

impl Layout {
    /// # Errors
    /// Returns `PlannerError::GridShapeMismatch` if the grids differ in shape.
    pub fn new(terrain: Grid, hazards: Grid, goals: Grid) -> Result<Self> {
        let (height, width) = terrain.shape();
        check_shape("hazards", &hazards, height, width)?;
        check_shape("goals", &goals, height, width)?;
        Ok(Layout {
            hazard_cells: hazards.iter().collect(),
            goal_cells: goals.iter().collect(),
            terrain,
            hazards,
            goals,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    pub fn terrain(&self) -> &Grid {
        &self.terrain
    }

    pub fn hazards(&self) -> &Grid {
        &self.hazards
    }

    pub fn goals(&self) -> &Grid {
        &self.goals
    }

    pub fn hazard_cells(&self) -> &[Cell] {
        &self.hazard_cells
    }

    pub fn goal_cells(&self) -> &[Cell] {
        &self.goal_cells
    }

    /// Anything the agent can stand on: terrain, goals and hazards.
    #[inline]
    pub fn is_surface(&self, cell: Cell) -> bool {
        self.terrain.get(cell) || self.goals.get(cell) || self.hazards.get(cell)
    }

    /// Topmost surface row in `col` at or below `from_row`.
    fn first_surface_from(&self, from_row: usize, col: usize) -> Option<usize> {
        (from_row..self.height()).find(|&row| self.is_surface(Cell::new(row, col)))
    }
}

fn check_shape(name: &'static str, grid: &Grid, height: usize, width: usize) -> Result<()> {
    if grid.shape() != (height, width) {
        return Err(PlannerError::GridShapeMismatch {
            grid: name,
            height,
            width,
            found_height: grid.height(),
            found_width: grid.width(),
        });
    }
    Ok(())
}

/// One simulated instant of the tile world.
///
/// Cloning is cheap: the layout is reference-counted and only the agent
/// cell varies between states derived from the same root.
#[derive(Clone, PartialEq, Eq)]
pub struct WorldState {
    layout: Arc<Layout>,
    agent: Cell,
    just_started: bool,
}

impl WorldState {
    /// Build the root state from the four observation grids.
    ///
    /// The root is marked as just started, which suppresses the border
    /// failure check for this state only.
    ///
    /// # Errors
    /// - `PlannerError::GridShapeMismatch` if the grids differ in shape
    /// - `PlannerError::AgentNotFound` if the agent grid is empty
    /// - `PlannerError::MultipleAgents` if it has more than one occupied cell
    pub fn from_grids(terrain: Grid, hazards: Grid, goals: Grid, agent: &Grid) -> Result<Self> {
        let layout = Layout::new(terrain, hazards, goals)?;
        check_shape("agent", agent, layout.height(), layout.width())?;
        let agent = locate_agent(agent)?;
        Ok(WorldState {
            layout: Arc::new(layout),
            agent,
            just_started: true,
        })
    }

    /// Build a state on an existing layout.
    ///
    /// # Errors
    /// Returns `PlannerError::OutOfBounds` if `agent` lies outside the layout.
    pub fn with_agent(layout: Arc<Layout>, agent: Cell, just_started: bool) -> Result<Self> {
        if !layout.terrain().contains(agent) {
            return Err(PlannerError::OutOfBounds {
                row: agent.row as isize,
                col: agent.col as isize,
            });
        }
        Ok(WorldState {
            layout,
            agent,
            just_started,
        })
    }

    /// Parse a level drawn in ASCII.
    ///
    /// ```text
    /// .  empty        #  terrain
    /// ^  hazard       *  goal
    /// A  agent
    /// ```
    ///
    /// Blank lines are ignored and trailing whitespace is trimmed.
    ///
    /// # Errors
    /// Returns an error for unknown characters, ragged rows, or anything
    /// other than exactly one agent.
    pub fn from_ascii(level: &str) -> Result<Self> {
        let rows: Vec<&str> = level
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());

        let mut terrain = Grid::new(height, width)?;
        let mut hazards = Grid::new(height, width)?;
        let mut goals = Grid::new(height, width)?;
        let mut agent = Grid::new(height, width)?;

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(PlannerError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                match ch {
                    '.' => {}
                    '#' => terrain.set(cell, true)?,
                    '^' => hazards.set(cell, true)?,
                    '*' => goals.set(cell, true)?,
                    'A' => agent.set(cell, true)?,
                    _ => return Err(PlannerError::InvalidCell { row, col, ch }),
                }
            }
        }

        WorldState::from_grids(terrain, hazards, goals, &agent)
    }

    /// The agent's current cell.
    #[inline]
    pub fn agent(&self) -> Cell {
        self.agent
    }

    /// The agent position as a boolean grid with exactly one occupied cell.
    pub fn agent_grid(&self) -> Grid {
        let mut grid = Grid::new(self.height(), self.width())
            .expect("BUG: layout dimensions are non-zero");
        grid.set(self.agent, true)
            .expect("BUG: agent cell lies inside the layout");
        grid
    }

    #[inline]
    pub fn just_started(&self) -> bool {
        self.just_started
    }

    #[inline]
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.layout.height()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    /// The same position treated as a fresh observation.
    pub fn as_observation(&self) -> WorldState {
        WorldState {
            just_started: true,
            ..self.clone()
        }
    }

    /// Move the agent by the action's delta, then let it fall onto the first
    /// surface at or below the destination if nothing supports it there.
    ///
    /// # Errors
    /// Returns `PlannerError::OutOfBounds` if the destination leaves the grid.
    pub fn apply(&self, action: Action) -> Result<WorldState> {
        let (d_row, d_col) = action.delta();
        let out_of_bounds = PlannerError::OutOfBounds {
            row: self.agent.row as isize + d_row,
            col: self.agent.col as isize + d_col,
        };
        let dest = self.agent.offset(d_row, d_col).ok_or(out_of_bounds.clone())?;
        if !self.layout.terrain().contains(dest) {
            return Err(out_of_bounds);
        }

        let landing = if self.layout.is_surface(dest.below()) {
            dest
        } else {
            let floor = self
                .layout
                .first_surface_from(dest.row, dest.col)
                .unwrap_or(self.height());
            // A surface at the destination on row 0 leaves nowhere above to stand.
            Cell::new(floor.saturating_sub(1), dest.col)
        };

        Ok(WorldState {
            layout: Arc::clone(&self.layout),
            agent: landing,
            just_started: false,
        })
    }

    /// Evaluate this state: hazards first, then goals, then the outer border.
    pub fn outcome(&self) -> Outcome {
        let here = self.agent;
        let below = here.below();
        let hazards = self.layout.hazards();
        let goals = self.layout.goals();

        if hazards.get(here) || hazards.get(below) {
            return Outcome::Loss;
        }
        if goals.get(here) || goals.get(below) {
            return Outcome::Win;
        }
        if !self.just_started && self.on_border() {
            return Outcome::Loss;
        }
        Outcome::Ongoing
    }

    /// Integer result: -1 loss, 0 ongoing, +1 win.
    #[inline]
    pub fn result(&self) -> i8 {
        self.outcome().value()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// Left column, right column or bottom row.
    pub fn on_border(&self) -> bool {
        self.agent.col == 0
            || self.agent.col + 1 == self.width()
            || self.agent.row + 1 == self.height()
    }
}

fn locate_agent(agent: &Grid) -> Result<Cell> {
    let mut cells = agent.iter();
    let first = cells.next().ok_or(PlannerError::AgentNotFound)?;
    let extra = cells.count();
    if extra > 0 {
        return Err(PlannerError::MultipleAgents(extra + 1));
    }
    Ok(first)
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height() {
            for col in 0..self.width() {
                let cell = Cell::new(row, col);
                let c = if cell == self.agent {
                    'A'
                } else if self.layout.hazards().get(cell) {
                    '^'
                } else if self.layout.goals().get(cell) {
                    '*'
                } else if self.layout.terrain().get(cell) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("shape", &(self.height(), self.width()))
            .field("agent", &self.agent)
            .field("just_started", &self.just_started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = "
........
........
...A....
########
........
";

    #[test]
    fn test_parse_ascii() {
        let state = WorldState::from_ascii(FLAT).unwrap();
        assert_eq!(state.height(), 5);
        assert_eq!(state.width(), 8);
        assert_eq!(state.agent(), Cell::new(2, 3));
        assert!(state.just_started());
        assert_eq!(state.layout().terrain().count(), 8);
        assert_eq!(state.to_string().trim(), FLAT.trim());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            WorldState::from_ascii("...\n...\n").unwrap_err(),
            PlannerError::AgentNotFound
        );
        assert_eq!(
            WorldState::from_ascii("A.A\n...\n").unwrap_err(),
            PlannerError::MultipleAgents(2)
        );
        assert_eq!(
            WorldState::from_ascii("A.x\n").unwrap_err(),
            PlannerError::InvalidCell { row: 0, col: 2, ch: 'x' }
        );
        assert!(matches!(
            WorldState::from_ascii("A..\n..\n").unwrap_err(),
            PlannerError::RaggedRow { row: 1, .. }
        ));
        assert_eq!(WorldState::from_ascii("\n\n").unwrap_err(), PlannerError::EmptyGrid);
    }

    #[test]
    fn test_from_grids_shape_mismatch() {
        let terrain = Grid::new(4, 4).unwrap();
        let hazards = Grid::new(4, 3).unwrap();
        let goals = Grid::new(4, 4).unwrap();
        let mut agent = Grid::new(4, 4).unwrap();
        agent.set(Cell::new(1, 1), true).unwrap();
        let err = WorldState::from_grids(terrain, hazards, goals, &agent).unwrap_err();
        assert!(matches!(
            err,
            PlannerError::GridShapeMismatch { grid: "hazards", .. }
        ));
    }

    #[test]
    fn test_agent_grid_has_one_cell() {
        let state = WorldState::from_ascii(FLAT).unwrap();
        let grid = state.agent_grid();
        assert_eq!(grid.count(), 1);
        assert!(grid.get(Cell::new(2, 3)));
    }

    #[test]
    fn test_apply_lateral_on_ground() {
        let state = WorldState::from_ascii(FLAT).unwrap();
        let next = state.apply(Action::Right).unwrap();
        assert_eq!(next.agent(), Cell::new(2, 4));
        assert!(!next.just_started());
        // Layout is shared, not copied.
        assert!(Arc::ptr_eq(state.layout(), next.layout()));
    }

    #[test]
    fn test_apply_jump_lands_on_floor() {
        let state = WorldState::from_ascii(FLAT).unwrap();
        let next = state.apply(Action::JumpRightBig).unwrap();
        assert_eq!(next.agent(), Cell::new(2, 7));
        let next = state.apply(Action::JumpLeftSmall).unwrap();
        assert_eq!(next.agent(), Cell::new(2, 1));
    }

    #[test]
    fn test_apply_fall_to_nearest_surface() {
        let level = "
.......
..A....
..#....
.......
...#...
.......
...#...
.......
";
        let state = WorldState::from_ascii(level).unwrap();
        let next = state.apply(Action::Right).unwrap();
        assert_eq!(next.agent(), Cell::new(3, 3));
    }

    #[test]
    fn test_apply_fall_without_surface_hits_bottom_row() {
        let level = "
.....
.A...
.#...
.....
";
        let state = WorldState::from_ascii(level).unwrap();
        let next = state.apply(Action::Right).unwrap();
        assert_eq!(next.agent(), Cell::new(3, 2));
        assert_eq!(next.outcome(), Outcome::Loss);
    }

    #[test]
    fn test_apply_out_of_bounds() {
        let level = "
A...
####
";
        let state = WorldState::from_ascii(level).unwrap();
        assert_eq!(
            state.apply(Action::Left).unwrap_err(),
            PlannerError::OutOfBounds { row: 0, col: -1 }
        );
        assert!(state.apply(Action::JumpRightSmall).is_err());
    }

    #[test]
    fn test_apply_nothing_falls() {
        let level = "
.....
..A..
.....
.....
..#..
";
        let state = WorldState::from_ascii(level).unwrap();
        let next = state.apply(Action::Nothing).unwrap();
        assert_eq!(next.agent(), Cell::new(3, 2));
    }

    #[test]
    fn test_outcome_hazard_and_goal() {
        let on_hazard = WorldState::from_ascii("......\n..A...\n..^...\n......\n").unwrap();
        assert_eq!(on_hazard.outcome(), Outcome::Loss);
        assert_eq!(on_hazard.result(), -1);

        let on_goal = WorldState::from_ascii("......\n..A...\n..*...\n......\n").unwrap();
        assert_eq!(on_goal.outcome(), Outcome::Win);
        assert_eq!(on_goal.result(), 1);
        assert!(on_goal.is_terminal());
    }

    #[test]
    fn test_hazard_checked_before_goal() {
        let mut terrain = Grid::new(4, 4).unwrap();
        terrain.set(Cell::new(3, 1), true).unwrap();
        let mut hazards = Grid::new(4, 4).unwrap();
        hazards.set(Cell::new(2, 1), true).unwrap();
        let mut goals = Grid::new(4, 4).unwrap();
        goals.set(Cell::new(1, 1), true).unwrap();
        let mut agent = Grid::new(4, 4).unwrap();
        agent.set(Cell::new(1, 1), true).unwrap();
        let state = WorldState::from_grids(terrain, hazards, goals, &agent).unwrap();
        assert_eq!(state.outcome(), Outcome::Loss);
    }

    #[test]
    fn test_border_ignored_only_when_just_started() {
        let level = "
.....
A....
#####
";
        let root = WorldState::from_ascii(level).unwrap();
        assert_eq!(root.outcome(), Outcome::Ongoing);
        assert!(root.on_border());

        let moved = WorldState::with_agent(Arc::clone(root.layout()), root.agent(), false).unwrap();
        assert_eq!(moved.outcome(), Outcome::Loss);
        assert_eq!(moved.as_observation().outcome(), Outcome::Ongoing);
    }
}
