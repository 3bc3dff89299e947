//! Command-line planner for the tile-world agent.
//!
//! Reads a level drawn in ASCII, runs the root-parallel tree search on it,
//! and either prints a single decision or plays the level out step by step.

mod config;
mod episode;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::PlannerConfig;
use tilebot_mcts::ParallelSearch;
use tilebot_world::{TileWorld, WorldState};
use tracing::info;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// Tile-world MCTS planner.
#[derive(Parser)]
#[command(name = "tilebot")]
#[command(about = "Plan moves for a grid platform agent with parallel MCTS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose one action for the level's current position.
    Decide {
        /// ASCII level file (. empty, # terrain, ^ hazard, * goal, A agent).
        #[arg(short, long)]
        map: PathBuf,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Repeatedly decide and act until the level is won, lost or the step limit hits.
    Play {
        /// ASCII level file (. empty, # terrain, ^ hazard, * goal, A agent).
        #[arg(short, long)]
        map: PathBuf,

        /// Maximum number of decisions.
        #[arg(long, default_value = "100")]
        max_steps: usize,

        /// Save the episode as MessagePack.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print a saved episode.
    Show {
        /// MessagePack episode written by `play --output`.
        episode: PathBuf,
    },
}

/// Flags shared by every command. Each one overrides the config file.
#[derive(Args, Debug, Default, Clone)]
struct SearchArgs {
    /// Config file (default: $TILEBOT_CONFIG, then ./tilebot.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of parallel search workers.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Iterations per worker per decision.
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Random seed for reproducibility.
    #[arg(long)]
    seed: Option<u64>,

    /// Restrict actions to LEFT / RIGHT.
    #[arg(long)]
    no_jumping: bool,

    /// Bias rollouts toward the most reachable goal.
    #[arg(long)]
    weighted_directions: bool,
}

impl SearchArgs {
    /// Load the config file and layer these flags on top.
    fn resolve(&self) -> Result<PlannerConfig> {
        let mut config = config::load_config(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut PlannerConfig) {
        if let Some(workers) = self.workers {
            config.search.workers = workers;
        }
        if let Some(iterations) = self.iterations {
            config.search.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.search.seed = Some(seed);
        }
        if self.no_jumping {
            config.rules.no_jumping = true;
        }
        if self.weighted_directions {
            config.rules.weighted_directions = true;
        }
    }
}

/// Subscriber used while the config file is still being located.
fn bootstrap_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_level(path: &Path) -> Result<WorldState> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read level: {}", path.display()))?;
    WorldState::from_ascii(&text).with_context(|| format!("Invalid level: {}", path.display()))
}

fn build_search(config: &PlannerConfig) -> ParallelSearch<TileWorld> {
    ParallelSearch::new(TileWorld::new(config.rules()), config.search_config())
}

/// Run the decide command.
fn cmd_decide(map: &Path, config: &PlannerConfig) -> Result<()> {
    let state = load_level(map)?;
    let search = build_search(config);
    info!(
        workers = config.search.workers,
        iterations = config.search.iterations,
        "Deciding for {}",
        map.display()
    );

    let start = Instant::now();
    let decision = search.decide(&state).context("Search failed")?;
    let elapsed = start.elapsed();

    println!("{}", state);
    println!("Action: {}", decision.action);
    println!("Root visits: {}", decision.root_visits);
    println!("{:<18} {:>7} {:>6} {:>7} {:>7}", "branch", "visits", "wins", "losses", "score");
    for child in &decision.children {
        println!(
            "{:<18} {:>7} {:>6} {:>7} {:>7.3}",
            child.action.name(),
            child.visits,
            child.wins,
            child.losses,
            child.mean_score()
        );
    }
    println!("Completed in {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

/// Run the play command.
fn cmd_play(
    map: &Path,
    max_steps: usize,
    output: Option<&Path>,
    config: &PlannerConfig,
) -> Result<()> {
    let state = load_level(map)?;
    let search = build_search(config);

    let start = Instant::now();
    let episode = episode::play_episode(&search, &state, max_steps)?;
    let elapsed = start.elapsed();

    for (i, step) in episode.steps.iter().enumerate() {
        println!(
            "{:>4}  ({:>2}, {:>2})  {}",
            i, step.agent.0, step.agent.1, step.action
        );
    }
    let verdict = match episode.outcome {
        1 => "goal reached",
        -1 => "lost",
        _ => "step limit reached",
    };
    println!(
        "\n{} after {} steps in {:.2}s",
        verdict,
        episode.len(),
        elapsed.as_secs_f64()
    );

    if let Some(path) = output {
        episode::save_episode(path, &episode)?;
        println!("Episode saved to: {}", path.display());
    }
    Ok(())
}

/// Run the show command.
fn cmd_show(path: &Path) -> Result<()> {
    let episode = episode::load_episode(path)?;
    if episode.is_empty() {
        println!("(no steps)");
    }
    for (i, step) in episode.steps.iter().enumerate() {
        println!(
            "{:>4}  ({:>2}, {:>2})  {:<18} visits={}",
            i, step.agent.0, step.agent.1, step.action, step.root_visits
        );
    }
    println!("outcome: {}", episode.outcome);
    let mut keys: Vec<_> = episode.metadata.keys().collect();
    keys.sort();
    for key in keys {
        println!("{}: {}", key, episode.metadata[key]);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let search_args = match &cli.command {
        Commands::Decide { search, .. } | Commands::Play { search, .. } => search.clone(),
        Commands::Show { .. } => SearchArgs::default(),
    };
    let bootstrap = bootstrap_subscriber(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        std::io::stderr,
    );
    let config = tracing::subscriber::with_default(bootstrap, || search_args.resolve())?;
    init_tracing(&config.logging.level);
    info!(?config, "configuration resolved");

    match cli.command {
        Commands::Decide { map, .. } => cmd_decide(&map, &config),
        Commands::Play {
            map,
            max_steps,
            output,
            ..
        } => cmd_play(&map, max_steps, output.as_deref(), &config),
        Commands::Show { episode } => cmd_show(&episode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_cli_parses_decide() {
        let cli = Cli::try_parse_from([
            "tilebot", "decide", "--map", "level.txt", "--workers", "3", "--seed", "5",
            "--no-jumping",
        ])
        .unwrap();

        match cli.command {
            Commands::Decide { map, search } => {
                assert_eq!(map, PathBuf::from("level.txt"));
                assert_eq!(search.workers, Some(3));
                assert_eq!(search.seed, Some(5));
                assert!(search.no_jumping);
                assert!(!search.weighted_directions);
            }
            _ => panic!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_play_defaults() {
        let cli = Cli::try_parse_from(["tilebot", "play", "-m", "level.txt"]).unwrap();
        match cli.command {
            Commands::Play {
                max_steps, output, ..
            } => {
                assert_eq!(max_steps, 100);
                assert!(output.is_none());
            }
            _ => panic!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_show() {
        let cli = Cli::try_parse_from(["tilebot", "show", "run.msgpack"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { episode } if episode == PathBuf::from("run.msgpack")));
    }

    #[test]
    fn test_cli_requires_map() {
        assert!(Cli::try_parse_from(["tilebot", "decide"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = PlannerConfig::default();
        let args = SearchArgs {
            iterations: Some(9),
            weighted_directions: true,
            ..Default::default()
        };
        args.apply(&mut config);

        assert_eq!(config.search.iterations, 9);
        assert_eq!(config.search.workers, 8);
        assert!(config.rules.weighted_directions);
        assert!(!config.rules.no_jumping);
    }

    #[test]
    fn test_load_level_reports_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "..A..\n..A..\n#####").unwrap();
        let err = load_level(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid level"));
    }

    #[test]
    fn test_shipped_levels_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("levels");
        let mut count = 0;
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                let state = load_level(&path).unwrap();
                assert!(!state.is_terminal(), "{} starts terminal", path.display());
                count += 1;
            }
        }
        assert!(count > 0);
    }

    #[test]
    fn test_config_resolution_is_logged() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nworkers = 3").unwrap();
        let args = SearchArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = bootstrap_subscriber(EnvFilter::new("info"), move || writer.clone());
        let config = tracing::subscriber::with_default(subscriber, || args.resolve()).unwrap();

        assert_eq!(config.search.workers, 3);
        assert!(captured.text().contains("Loading config from --config"));
    }
}
