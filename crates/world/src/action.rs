//! Discrete agent actions and their fixed movement deltas.
//!
//! Every action is a (rows, columns) displacement applied before gravity:
//! - `LEFT` / `RIGHT`: one column sideways
//! - small jumps: 2 rows up, 2 columns sideways
//! - big jumps: 2 rows up, 4 columns sideways
//! - `NOTHING`: stay put (gravity still applies)

use std::fmt;
use std::str::FromStr;

/// Horizontal direction of travel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column step: -1 for left, +1 for right.
    #[inline]
    pub const fn sign(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Jump variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum JumpSize {
    Small,
    Big,
}

impl JumpSize {
    /// Rows gained at the apex of any jump.
    pub const RISE: usize = 2;

    /// Columns travelled horizontally.
    #[inline]
    pub const fn reach(self) -> usize {
        match self {
            JumpSize::Small => 2,
            JumpSize::Big => 4,
        }
    }

    /// Furthest column offset checked for hazards along the arc.
    #[inline]
    pub const fn hazard_span(self) -> usize {
        match self {
            JumpSize::Small => 1,
            JumpSize::Big => 2,
        }
    }

    /// Rows above the launch cell the arc sweeps through.
    #[inline]
    pub const fn clearance(self) -> usize {
        match self {
            JumpSize::Small => 2,
            JumpSize::Big => 3,
        }
    }
}

/// An agent action.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Left,
    Right,
    JumpLeftSmall,
    JumpLeftBig,
    JumpRightSmall,
    JumpRightBig,
    Nothing,
}

impl Action {
    /// Full action vocabulary.
    pub const ALL: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::JumpLeftSmall,
        Action::JumpLeftBig,
        Action::JumpRightSmall,
        Action::JumpRightBig,
        Action::Nothing,
    ];

    /// Candidate moves in the order the legal-action pipeline starts from.
    pub const MOVES: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::JumpRightSmall,
        Action::JumpRightBig,
        Action::JumpLeftSmall,
        Action::JumpLeftBig,
    ];

    /// Candidate moves when jumping is disabled.
    pub const LATERAL: [Action; 2] = [Action::Left, Action::Right];

    /// The four jump actions.
    pub const JUMPS: [Action; 4] = [
        Action::JumpRightSmall,
        Action::JumpRightBig,
        Action::JumpLeftSmall,
        Action::JumpLeftBig,
    ];

    /// Horizontal direction, or `None` for `NOTHING`.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Action::Left | Action::JumpLeftSmall | Action::JumpLeftBig => Some(Direction::Left),
            Action::Right | Action::JumpRightSmall | Action::JumpRightBig => {
                Some(Direction::Right)
            }
            Action::Nothing => None,
        }
    }

    /// Jump variant, or `None` for non-jumps.
    pub const fn jump(self) -> Option<JumpSize> {
        match self {
            Action::JumpLeftSmall | Action::JumpRightSmall => Some(JumpSize::Small),
            Action::JumpLeftBig | Action::JumpRightBig => Some(JumpSize::Big),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_jump(self) -> bool {
        self.jump().is_some()
    }

    /// (row, column) displacement before gravity is resolved.
    pub const fn delta(self) -> (isize, isize) {
        let sign = match self.direction() {
            Some(dir) => dir.sign(),
            None => 0,
        };
        match self.jump() {
            Some(size) => (-(JumpSize::RISE as isize), sign * size.reach() as isize),
            None => (0, sign),
        }
    }

    /// Canonical upper-case name, e.g. `JUMP_RIGHT_BIG`.
    pub const fn name(self) -> &'static str {
        match self {
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
            Action::JumpLeftSmall => "JUMP_LEFT_SMALL",
            Action::JumpLeftBig => "JUMP_LEFT_BIG",
            Action::JumpRightSmall => "JUMP_RIGHT_SMALL",
            Action::JumpRightBig => "JUMP_RIGHT_BIG",
            Action::Nothing => "NOTHING",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown action name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseActionError(pub String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action: {}", self.0)
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
