//! Tilebot World - the grid platform world model
//!
//! A level is four same-shaped boolean grids (terrain, hazards, goals and the
//! agent). States are immutable snapshots; `apply` derives the next one,
//! resolving gravity by dropping the agent onto the first surface below.
//!
//! # Example
//!
//! ```
//! use tilebot_world::{Action, Rules, WorldState};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let level = "
//! ........
//! ........
//! ........
//! ........
//! ..A..*..
//! .#######
//! ";
//! let state = WorldState::from_ascii(level).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(0);
//! let actions = state.legal_actions(&Rules::default(), &mut rng);
//! assert!(actions.contains(&Action::Right));
//!
//! let next = state.apply(Action::Right).unwrap();
//! assert_eq!(next.result(), 0);
//! ```

mod action;
mod cell;
mod game_impl;
mod grid;
mod heuristics;
mod legal;
mod rules;
mod state;

pub use action::{Action, Direction, JumpSize, ParseActionError};
pub use cell::Cell;
pub use game_impl::TileWorld;
pub use grid::Grid;
pub use rules::{Rules, DEFAULT_DIRECTION_BIAS_PROBABILITY};
pub use state::{Layout, WorldState};
