//! Closed-loop play against the world model.
//!
//! Each step treats the current position as a fresh observation, asks the
//! parallel search for a decision, and applies it. Episodes can be saved in
//! MessagePack format for offline analysis.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tilebot_mcts::{ChildSummary, Decision, ParallelSearch};
use tilebot_world::{Action, TileWorld, WorldState};
use tracing::{debug, info};

/// Per-branch statistics at one decision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BranchRecord {
    pub action: String,
    pub visits: u32,
    pub wins: u32,
    pub losses: u32,
}

impl From<&ChildSummary<Action>> for BranchRecord {
    fn from(child: &ChildSummary<Action>) -> Self {
        Self {
            action: child.action.name().to_string(),
            visits: child.visits,
            wins: child.wins,
            losses: child.losses,
        }
    }
}

/// A single step in an episode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EpisodeStep {
    /// Agent cell (row, column) before acting.
    pub agent: (usize, usize),

    pub action: String,

    pub root_visits: u32,

    pub branches: Vec<BranchRecord>,
}

/// A complete episode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Episode {
    pub steps: Vec<EpisodeStep>,

    /// Final result: +1 goal reached, -1 lost, 0 step limit hit.
    pub outcome: i8,

    pub metadata: HashMap<String, serde_json::Value>,
}

impl Episode {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Play from `start` until the episode ends or `max_steps` decisions are made.
pub fn play_episode(
    search: &ParallelSearch<TileWorld>,
    start: &WorldState,
    max_steps: usize,
) -> Result<Episode> {
    let mut state = start.clone();
    let mut steps = Vec::new();

    while !state.is_terminal() && steps.len() < max_steps {
        let observation = state.as_observation();
        let decision: Decision<Action> = search
            .decide(&observation)
            .with_context(|| format!("Search failed at step {}", steps.len()))?;

        let agent = state.agent();
        let next = state
            .apply(decision.action)
            .with_context(|| format!("Failed to apply {} at {}", decision.action, agent))?;
        debug!(step = steps.len(), %agent, action = %decision.action, to = %next.agent(), "step");

        steps.push(EpisodeStep {
            agent: (agent.row, agent.col),
            action: decision.action.name().to_string(),
            root_visits: decision.root_visits,
            branches: decision.children.iter().map(BranchRecord::from).collect(),
        });
        state = next;
    }

    let outcome = state.result();
    info!(steps = steps.len(), outcome, "episode finished");

    let config = search.config();
    let mut metadata = HashMap::new();
    metadata.insert("steps".to_string(), serde_json::json!(steps.len()));
    metadata.insert("max_steps".to_string(), serde_json::json!(max_steps));
    metadata.insert("workers".to_string(), serde_json::json!(config.worker_count));
    metadata.insert(
        "iterations_per_worker".to_string(),
        serde_json::json!(config.iterations_per_worker),
    );
    metadata.insert("seed".to_string(), serde_json::json!(config.seed));
    metadata.insert(
        "final_agent".to_string(),
        serde_json::json!([state.agent().row, state.agent().col]),
    );

    Ok(Episode {
        steps,
        outcome,
        metadata,
    })
}

/// Write `episode` to `path` as MessagePack with named fields.
pub fn save_episode(path: &Path, episode: &Episode) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    // Use named fields to serialize structs as maps (not arrays)
    rmp_serde::encode::write_named(&mut writer, episode)
        .with_context(|| format!("Failed to serialize episode to {}", path.display()))?;
    Ok(())
}

pub fn load_episode(path: &Path) -> Result<Episode> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    rmp_serde::from_read(file)
        .with_context(|| format!("Failed to deserialize episode from {}", path.display()))
}
