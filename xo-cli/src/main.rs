//! XO CLI - Command-line interface
//!
//! Commands:
//! - play: Play one game, humans and/or automated players
//! - match: Series of games between two automated players
//! - tournament: Round-robin between a roster of automated players

mod human;
mod match_cmd;
mod play_cmd;
mod tournament_cmd;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xo")]
#[command(about = "N×N tic-tac-toe with pluggable strategies")]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a series of games between two players
    Match(match_cmd::MatchArgs),
    /// Run a round-robin tournament
    Tournament(tournament_cmd::TournamentArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Tournament(args) => tournament_cmd::run(args, cli.seed),
    }
}

/// Initialize logging on stderr so reports on stdout stay parseable
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
