//! Tournament command - round-robin between automated players
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_roster(), load_config(), report_results()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use xo_tournament::{run_tournament, StrategyConfig, TournamentConfig, TournamentResult};

#[derive(Args)]
pub struct TournamentArgs {
    /// Roster JSON file (array of players); defaults to one player per type
    #[arg(long, value_name = "FILE")]
    pub entries: Option<PathBuf>,

    /// Tournament config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Games per pairing (overrides the config file)
    #[arg(long)]
    pub games: Option<usize>,

    /// Board side length (overrides the config file)
    #[arg(long)]
    pub size: Option<usize>,

    /// Play pairings one after another
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run tournament command
pub fn run(args: TournamentArgs, seed: Option<u64>) -> Result<()> {
    let entries = load_roster(&args)?;
    let config = load_config(&args, seed)?;

    let result = run_tournament(&entries, &config).context("Tournament failed")?;

    report_results(&result, args.json)
}

fn load_roster(args: &TournamentArgs) -> Result<Vec<StrategyConfig>> {
    match &args.entries {
        Some(path) => StrategyConfig::load_roster(path),
        None => Ok(StrategyConfig::default_roster()),
    }
}

fn load_config(args: &TournamentArgs, seed: Option<u64>) -> Result<TournamentConfig> {
    let mut config = match &args.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::default(),
    };

    if let Some(games) = args.games {
        config.games_per_match = games;
    }
    if let Some(size) = args.size {
        config.board_size = size;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    if args.sequential {
        config.parallel = false;
    }

    Ok(config)
}

fn report_results(result: &TournamentResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.standings)?);
        return Ok(());
    }

    println!("\n=== Standings ===");
    println!(
        "{:>3}  {:<16} {:>6} {:>5} {:>5} {:>5} {:>9}",
        "#", "Name", "Score", "W", "L", "D", "Avg turns"
    );
    for (rank, s) in result.standings.iter().enumerate() {
        println!(
            "{:>3}  {:<16} {:>6.1} {:>5} {:>5} {:>5} {:>9.1}",
            rank + 1,
            s.name,
            s.score,
            s.wins,
            s.losses,
            s.draws,
            s.avg_turns
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> TournamentArgs {
        TournamentArgs {
            entries: None,
            config: None,
            games: None,
            size: None,
            sequential: false,
            json: false,
        }
    }

    #[test]
    fn test_default_roster_without_file() {
        let roster = load_roster(&args()).unwrap();
        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["random", "heuristic", "lookahead"]);
    }

    #[test]
    fn test_missing_roster_file() {
        let mut a = args();
        a.entries = Some(PathBuf::from("/nonexistent/roster.json"));
        assert!(load_roster(&a).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut a = args();
        a.games = Some(2);
        a.sequential = true;
        let config = load_config(&a, Some(5)).unwrap();
        assert_eq!(config.games_per_match, 2);
        assert_eq!(config.seed, Some(5));
        assert!(!config.parallel);
        assert_eq!(config.board_size, 3);
    }
}
