use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use isolation::error::ConfigError;
use isolation::grid::{grid_search, Family, GridConfig};
use isolation::tournament::{default_cpu_agents, play_round, Entrant, TournamentConfig};
use isolation::types::{DEFAULT_NUM_MATCHES, DEFAULT_TIMER_THRESHOLD_MS, DEFAULT_TIME_LIMIT_MS};
use isolation::{Agent, Heuristic};

#[derive(Parser)]
#[command(name = "isolation")]
#[command(version, about = "Isolation agents and heuristic tuning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tune one heuristic family over its whole weight lattice
    Grid(GridArgs),

    /// Play one agent against the standard roster
    Tournament(TournamentArgs),
}

#[derive(Args)]
struct MatchArgs {
    /// Matches per opponent (two games each, sides swapped)
    #[arg(long, default_value_t = DEFAULT_NUM_MATCHES)]
    num_matches: usize,

    /// Milliseconds per move
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_MS)]
    time_limit: f64,

    /// Seed for openings and random players
    #[arg(long)]
    seed: Option<u64>,
}

impl MatchArgs {
    fn config(&self) -> TournamentConfig {
        TournamentConfig {
            num_matches: self.num_matches,
            time_limit_ms: self.time_limit,
            seed: self.seed,
            ..TournamentConfig::default()
        }
    }
}

#[derive(Args)]
struct GridArgs {
    family: Family,

    #[command(flatten)]
    matches: MatchArgs,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    jobs: Option<usize>,

    /// Write the full report as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Fn1,
    Fn2,
    Fn3,
    Improved,
    Open,
    Center,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Fn1 => Heuristic::REACH_DEFAULT,
            HeuristicArg::Fn2 => Heuristic::LOOKAHEAD_DEFAULT,
            HeuristicArg::Fn3 => Heuristic::MOBILITY_DEFAULT,
            HeuristicArg::Improved => Heuristic::Improved,
            HeuristicArg::Open => Heuristic::OpenMove,
            HeuristicArg::Center => Heuristic::Center,
        }
    }
}

#[derive(Args)]
struct TournamentArgs {
    /// Evaluator of the iterative-deepening agent under test
    #[arg(long, value_enum, default_value = "fn1")]
    heuristic: HeuristicArg,

    /// Stop searching once fewer than this many milliseconds remain
    #[arg(long, default_value_t = DEFAULT_TIMER_THRESHOLD_MS)]
    threshold: f64,

    #[command(flatten)]
    matches: MatchArgs,
}

impl TournamentArgs {
    fn agent(&self) -> Result<Agent<Heuristic>, ConfigError> {
        let mut builder = Agent::builder()
            .evaluator(Heuristic::from(self.heuristic))
            .timer_threshold_ms(self.threshold);
        if let Some(seed) = self.matches.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} points")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn run_grid(args: GridArgs) -> Result<()> {
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let config = GridConfig {
        family: args.family,
        tournament: args.matches.config(),
    };
    let report = grid_search(&config, &progress_bar()?)?;

    match report.best {
        Some(best) => println!("best: {} with {}/{} wins", best.heuristic, best.wins, best.games),
        None => println!("no points evaluated"),
    }

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn run_tournament(args: TournamentArgs) -> Result<()> {
    let config = args.matches.config();
    let agent = args.agent()?;
    let name = format!("{} ({}ms)", agent.config().evaluator, args.threshold);
    let mut test = Entrant::new(name, agent);
    let mut roster = default_cpu_agents(config.seed)?;

    let result = play_round(&mut test, &mut roster, &config)?;

    println!("{:<14}{:>6}{:>8}", "Opponent", "Won", "Lost");
    for record in &result.records {
        println!("{:<14}{:>6}{:>8}", record.name, record.wins, record.losses);
    }
    println!(
        "{}: {:.1}% ({} timeouts, {} forfeits)",
        test.name,
        100.0 * result.win_rate(),
        result.timeouts,
        result.forfeits
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Grid(args) => run_grid(args),
        Commands::Tournament(args) => run_tournament(args),
    }
}
