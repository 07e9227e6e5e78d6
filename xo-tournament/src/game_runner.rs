//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use anyhow::{anyhow, Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use xo_core::{GameLoop, Mark, Outcome, Strategy, Turn};

use crate::config::StrategyConfig;

/// Outcome of a single game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Final game result
    pub outcome: Outcome,
    /// Number of accepted moves
    pub turns: usize,
    /// Move history
    pub moves: Vec<Turn>,
    /// Mark of the side that moved first
    pub first_mover: Mark,
}

impl GameOutcome {
    /// Get winner (None for draw)
    pub fn winner(&self) -> Option<Mark> {
        self.outcome.winner()
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Drawn
    }

    /// Check if the side that moved first won
    pub fn first_mover_wins(&self) -> bool {
        self.winner() == Some(self.first_mover)
    }
}

/// Plays games between automated participants on a fixed board size
pub struct GameRunner {
    board_size: usize,
    /// Random seed counter
    seed_counter: u64,
}

impl GameRunner {
    /// Create a new game runner
    pub fn new(board_size: usize, seed: u64) -> Self {
        Self {
            board_size,
            seed_counter: seed,
        }
    }

    /// Play a single game, `first` holding X and moving first
    pub fn play_game(
        &mut self,
        first: &StrategyConfig,
        second: &StrategyConfig,
    ) -> Result<GameOutcome> {
        let seed = self.next_seed();
        let first_strategy = build_strategy(first, Mark::X, seed, 0)?;
        let second_strategy = build_strategy(second, Mark::O, seed, 1)?;

        let mut game = GameLoop::new(first_strategy, second_strategy, self.board_size)
            .with_context(|| format!("Failed to set up {} vs {}", first.name, second.name))?;
        let outcome = game
            .run()
            .with_context(|| format!("Game {} vs {} aborted", first.name, second.name))?;

        tracing::debug!(
            first = %first.name,
            second = %second.name,
            seed,
            %outcome,
            turns = game.turns(),
            "game finished"
        );

        Ok(GameOutcome {
            outcome,
            turns: game.turns(),
            moves: game.history().to_vec(),
            first_mover: Mark::X,
        })
    }

    /// Get next seed and increment counter
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(1);
        seed
    }

    /// Reset seed counter
    pub fn reset_seed(&mut self, seed: u64) {
        self.seed_counter = seed;
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }
}

/// Build the strategy for one seat with its own rng stream
fn build_strategy(
    config: &StrategyConfig,
    mark: Mark,
    game_seed: u64,
    seat: u64,
) -> Result<Strategy> {
    let seed = mix_seed(game_seed, seat) ^ config.seed.unwrap_or(0);
    Strategy::automated(
        config.kind.into(),
        config.name.clone(),
        mark,
        config.depth,
        ChaCha8Rng::seed_from_u64(seed),
    )
    .ok_or_else(|| anyhow!("{} is not an automated player", config.name))
}

/// Spread consecutive game seeds apart so the two seats never share a stream
fn mix_seed(game_seed: u64, seat: u64) -> u64 {
    game_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(seat.wrapping_mul(0xBF58_476D_1CE4_E5B9))
}
