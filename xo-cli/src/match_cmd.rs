//! Match command - play games between two automated players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), participants(), report_results()
//! - Level 3: print_json_results(), print_text_results()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use xo_tournament::{
    play_match_with_progress, MatchConfig, MatchResult, PlayerType, StrategyConfig,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Player moving first in even-numbered games
    #[arg(long)]
    pub first: PlayerType,

    /// Player moving first in odd-numbered games
    #[arg(long)]
    pub second: PlayerType,

    /// Number of games to play (overrides the config file)
    #[arg(long)]
    pub games: Option<usize>,

    /// Board side length (overrides the config file)
    #[arg(long)]
    pub size: Option<usize>,

    /// Search depth for lookahead players
    #[arg(long)]
    pub depth: Option<usize>,

    /// Match config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Play games one after another
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the match config (file, then flags)
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args, seed)?;
    let (first, second) = participants(&args);

    let result = play_match_with_progress(&first, &second, &config, |game| {
        tracing::info!(outcome = %game.outcome, turns = game.turns, "game finished");
    })
    .with_context(|| format!("Match {} vs {} failed", first.name, second.name))?;

    report_results(&first, &second, &config, &result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };

    if let Some(games) = args.games {
        config.games = games;
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

/// Name both sides after their type, numbered when the types match
fn participants(args: &MatchArgs) -> (StrategyConfig, StrategyConfig) {
    let (first_name, second_name) = if args.first == args.second {
        (format!("{}-1", args.first), format!("{}-2", args.second))
    } else {
        (args.first.to_string(), args.second.to_string())
    };

    let mut first = StrategyConfig::new(first_name, args.first);
    let mut second = StrategyConfig::new(second_name, args.second);
    if let Some(depth) = args.depth {
        first = first.with_depth(depth);
        second = second.with_depth(depth);
    }
    (first, second)
}

fn report_results(
    first: &StrategyConfig,
    second: &StrategyConfig,
    config: &MatchConfig,
    result: &MatchResult,
    json: bool,
) -> Result<()> {
    if json {
        print_json_results(first, second, config, result)
    } else {
        print_text_results(first, second, result);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_json_results(
    first: &StrategyConfig,
    second: &StrategyConfig,
    config: &MatchConfig,
    result: &MatchResult,
) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        first: &'a str,
        second: &'a str,
        board_size: usize,
        total_games: u32,
        first_wins: u32,
        second_wins: u32,
        draws: u32,
        avg_turns: f32,
        first_win_rate: f32,
        second_win_rate: f32,
        draw_rate: f32,
    }

    let output = JsonOutput {
        first: &first.name,
        second: &second.name,
        board_size: config.board_size,
        total_games: result.games_played,
        first_wins: result.first_wins,
        second_wins: result.second_wins,
        draws: result.draws,
        avg_turns: result.avg_turns,
        first_win_rate: result.first_win_rate(),
        second_win_rate: result.second_win_rate(),
        draw_rate: result.draw_rate(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(first: &StrategyConfig, second: &StrategyConfig, result: &MatchResult) {
    println!("\n=== Match Results ===");
    println!("Total games: {}", result.games_played);
    println!(
        "{:<12} {} ({})",
        format!("{}:", first.name),
        result.first_wins,
        percent(result.first_win_rate())
    );
    println!(
        "{:<12} {} ({})",
        format!("{}:", second.name),
        result.second_wins,
        percent(result.second_win_rate())
    );
    println!(
        "{:<12} {} ({})",
        "Draws:",
        result.draws,
        percent(result.draw_rate())
    );
    println!("Avg turns:   {:.1}", result.avg_turns);
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(rate: f32) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(first: PlayerType, second: PlayerType) -> MatchArgs {
        MatchArgs {
            first,
            second,
            games: None,
            size: None,
            depth: None,
            config: None,
            sequential: false,
            json: false,
        }
    }

    #[test]
    fn test_participants_get_distinct_names() {
        let (a, b) = participants(&args(PlayerType::Heuristic, PlayerType::Heuristic));
        assert_eq!(a.name, "heuristic-1");
        assert_eq!(b.name, "heuristic-2");

        let (a, b) = participants(&args(PlayerType::Random, PlayerType::Lookahead));
        assert_eq!(a.name, "random");
        assert_eq!(b.name, "lookahead");
    }

    #[test]
    fn test_depth_applies_to_both() {
        let mut a = args(PlayerType::Lookahead, PlayerType::Lookahead);
        a.depth = Some(2);
        let (first, second) = participants(&a);
        assert_eq!(first.depth, 2);
        assert_eq!(second.depth, 2);
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut a = args(PlayerType::Random, PlayerType::Random);
        a.games = Some(4);
        a.size = Some(5);
        a.sequential = true;

        let config = load_config(&a, Some(9)).unwrap();
        assert_eq!(config.games, 4);
        assert_eq!(config.board_size, 5);
        assert_eq!(config.seed, Some(9));
        assert!(!config.parallel);

        let untouched = load_config(&args(PlayerType::Random, PlayerType::Random), None).unwrap();
        assert_eq!(untouched, MatchConfig::default());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.5), "50.0%");
        assert_eq!(percent(0.0), "0.0%");
    }
}
