//! XO Tournament - Strategy comparison through game playing
//!
//! This crate provides tournament infrastructure:
//! - Single games between configured automated players
//! - Match play with alternating first mover
//! - Round-robin tournaments with standings
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: play_match (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: configuration

mod config;
mod game_runner;
mod match_play;
mod tournament;

pub use config::{check_unique_names, MatchConfig, PlayerType, StrategyConfig, TournamentConfig};
pub use game_runner::{GameOutcome, GameRunner};
pub use match_play::{play_match, play_match_with_progress, MatchResult};
pub use tournament::{run_tournament, Standing, TournamentResult};
