//! Root-parallel Monte Carlo Tree Search with a shallow tree merge.
//!
//! This crate searches any game implementing `tilebot_core::Game`.
//!
//! # Features
//!
//! - **Arena Trees**: nodes in a `Vec`, parent links as indices
//! - **UCB1 Selection**: net-result exploitation term plus log-ratio exploration
//! - **Rollout Abstraction**: swap how leaves are played out
//! - **Root Parallelism**: independent worker trees on a rayon pool, merged
//!   at the first level only
//!
//! # Example
//!
//! ```
//! use tilebot_mcts::{ParallelSearch, SearchConfig};
//! use tilebot_world::{Action, TileWorld, WorldState};
//!
//! let level = "
//! .......
//! .......
//! .......
//! .......
//! ..A*...
//! .###...
//! .......
//! ";
//! let state = WorldState::from_ascii(level).unwrap();
//! let config = SearchConfig::new(2, 50).with_seed(42);
//! let search = ParallelSearch::new(TileWorld::default(), config);
//!
//! let decision = search.decide(&state).unwrap();
//! assert_eq!(decision.action, Action::Right);
//! println!("Best action: {}", decision.action);
//! ```

pub mod config;
mod error;
pub mod merge;
mod node;
pub mod parallel;
pub mod rollout;
pub mod search;
mod tree;

#[cfg(test)]
mod testing;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use merge::{merge_worker_tree, merge_worker_trees};
pub use node::{Node, NodeId, NodeStats};
pub use parallel::{ChildSummary, Decision, ParallelSearch};
pub use rollout::{RandomRollout, RolloutPolicy};
pub use search::Mcts;
pub use tree::{GameNode, SearchTree};
