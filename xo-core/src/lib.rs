//! XO Core - Board engine and move strategies
//!
//! This crate provides the core logic for N×N tic-tac-toe:
//! - Coordinates, marks and the persistent board
//! - Winning-line generation for any board size
//! - Move strategies (random, heuristic, lookahead, interactive)
//! - The turn loop between two strategies

pub mod board;
pub mod error;
pub mod game;
pub mod lines;
pub mod strategy;

// Re-exports for convenient access
pub use board::{Board, Coordinate, Mark};
pub use error::{BoardError, ConfigError, GameError, StrategyError};
pub use game::{GameLoop, GameState, Outcome, Turn, MAX_AUTOMATED_REJECTIONS};
pub use lines::{generate, WinLine, WinLines};
pub use strategy::{
    heuristic_move, lookahead_move, random_empty_cell, HeuristicStrategy, InteractiveStrategy,
    LookaheadStrategy, MoveSource, RandomStrategy, ScriptedSource, Strategy, StrategyKind,
    DEFAULT_DEPTH,
};
