//! Tilebot Core - Game abstractions and common types
//!
//! This crate provides the core `Game` trait that the search engine uses
//! to drive any single-agent world model.
//!
//! # Types
//!
//! - [`Game`] - Trait for world model implementations
//! - [`Outcome`] - Loss / ongoing / win, valued -1 / 0 / +1
//! - [`PlannerError`] - Errors raised by world models and their inputs

mod error;
mod game;
mod types;

pub use error::{PlannerError, Result};
pub use game::Game;
pub use types::Outcome;
