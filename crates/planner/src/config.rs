//! Planner configuration.
//!
//! Settings come from a `tilebot.toml` file, then `TILEBOT_<SECTION>_<KEY>`
//! environment variables, then command-line flags (applied in `main`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tilebot_mcts::SearchConfig;
use tilebot_world::{Rules, DEFAULT_DIRECTION_BIAS_PROBABILITY};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TILEBOT_CONFIG";

/// Standard locations to search for tilebot.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "tilebot.toml",    // Current directory
    "../tilebot.toml", // Parent directory (when running from a crate)
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub search: SearchSection,
    pub rules: RulesSection,
    pub logging: LoggingSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub workers: usize,
    pub iterations: usize,
    pub exploration: f64,
    pub max_rollout_depth: usize,
    pub seed: Option<u64>,
}

impl Default for SearchSection {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            workers: defaults.worker_count,
            iterations: defaults.iterations_per_worker,
            exploration: defaults.exploration_constant,
            max_rollout_depth: defaults.max_rollout_depth,
            seed: defaults.seed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSection {
    pub no_jumping: bool,
    pub weighted_directions: bool,
    pub bias_probability: f64,
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            no_jumping: false,
            weighted_directions: false,
            bias_probability: DEFAULT_DIRECTION_BIAS_PROBABILITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            worker_count: self.search.workers,
            iterations_per_worker: self.search.iterations,
            exploration_constant: self.search.exploration,
            max_rollout_depth: self.search.max_rollout_depth,
            seed: self.search.seed,
        }
    }

    pub fn rules(&self) -> Rules {
        Rules {
            jumping_disabled: self.rules.no_jumping,
            weighted_direction_bias: self.rules.weighted_directions,
            direction_bias_probability: self.rules.bias_probability,
        }
    }
}

/// Load the planner configuration.
///
/// Searches in the following order:
/// 1. `explicit` (the `--config` flag); a missing file is an error
/// 2. Path in the TILEBOT_CONFIG environment variable
/// 3. `CONFIG_SEARCH_PATHS`
///
/// Falls back to built-in defaults when nothing is found. Environment
/// overrides are applied in every case.
pub fn load_config(explicit: Option<&Path>) -> Result<PlannerConfig> {
    if let Some(path) = explicit {
        info!("Loading config from --config: {}", path.display());
        return load_from_path(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No tilebot.toml found, using built-in defaults");
    Ok(apply_env_overrides(PlannerConfig::default()))
}

/// Load configuration from a specific path, then apply environment overrides.
pub fn load_from_path(path: &Path) -> Result<PlannerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(apply_env_overrides(config))
}

pub fn parse_config(content: &str) -> Result<PlannerConfig> {
    Ok(toml::from_str(content)?)
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($lookup:expr, $config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (usize, f64, bool, etc.)
    ($lookup:expr, $config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field
    ($lookup:expr, $config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: TILEBOT_<SECTION>_<KEY>
pub fn apply_env_overrides(config: PlannerConfig) -> PlannerConfig {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup` instead of the process environment.
pub fn apply_overrides<F>(mut config: PlannerConfig, lookup: F) -> PlannerConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Search
    env_override!(lookup, config, search.workers, "TILEBOT_SEARCH_WORKERS", parse);
    env_override!(lookup, config, search.iterations, "TILEBOT_SEARCH_ITERATIONS", parse);
    env_override!(lookup, config, search.exploration, "TILEBOT_SEARCH_EXPLORATION", parse);
    env_override!(
        lookup,
        config,
        search.max_rollout_depth,
        "TILEBOT_SEARCH_MAX_ROLLOUT_DEPTH",
        parse
    );
    env_override!(lookup, config, search.seed, "TILEBOT_SEARCH_SEED", optional_parse);

    // Rules
    env_override!(lookup, config, rules.no_jumping, "TILEBOT_RULES_NO_JUMPING", parse);
    env_override!(
        lookup,
        config,
        rules.weighted_directions,
        "TILEBOT_RULES_WEIGHTED_DIRECTIONS",
        parse
    );
    env_override!(
        lookup,
        config,
        rules.bias_probability,
        "TILEBOT_RULES_BIAS_PROBABILITY",
        parse
    );

    // Logging
    env_override!(lookup, config, logging.level, "TILEBOT_LOGGING_LEVEL");

    config
}
