use thiserror::Error;
use tilebot_core::{Outcome, PlannerError};

use crate::NodeId;

/// Errors raised while searching.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("game error: {0}")]
    Game(#[from] PlannerError),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("root state is already terminal ({0})")]
    TerminalRoot(Outcome),

    #[error("no children to select from")]
    NoChildren,

    #[error("node {0:?} has no untried actions")]
    NothingToExpand(NodeId),

    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
