//! Match play - multiple games between two participants
//!
//! Level 2 - Phase-level implementation

use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use xo_core::Mark;

use crate::config::{MatchConfig, StrategyConfig};
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a match (multiple games)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Wins for the participant passed first
    pub first_wins: u32,
    /// Wins for the participant passed second
    pub second_wins: u32,
    pub draws: u32,
    /// Average game length in turns
    pub avg_turns: f32,
    /// Total games played
    pub games_played: u32,
    /// Individual game outcomes, in game order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self {
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            avg_turns: 0.0,
            games_played: 0,
            game_outcomes: Vec::new(),
        }
    }

    /// Combine two results
    pub fn combine(&self, other: &MatchResult) -> MatchResult {
        let total_games = self.games_played + other.games_played;
        let avg_turns = if total_games > 0 {
            (self.avg_turns * self.games_played as f32
                + other.avg_turns * other.games_played as f32)
                / total_games as f32
        } else {
            0.0
        };

        let mut game_outcomes = self.game_outcomes.clone();
        game_outcomes.extend(other.game_outcomes.iter().cloned());

        MatchResult {
            first_wins: self.first_wins + other.first_wins,
            second_wins: self.second_wins + other.second_wins,
            draws: self.draws + other.draws,
            avg_turns,
            games_played: total_games,
            game_outcomes,
        }
    }

    /// Same match seen from the other participant
    pub fn swapped(&self) -> MatchResult {
        MatchResult {
            first_wins: self.second_wins,
            second_wins: self.first_wins,
            ..self.clone()
        }
    }

    pub fn first_win_rate(&self) -> f32 {
        self.rate(self.first_wins)
    }

    pub fn second_win_rate(&self) -> f32 {
        self.rate(self.second_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }

    fn rate(&self, count: u32) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            count as f32 / self.games_played as f32
        }
    }
}

/// Play a match between two participants (Level 2 phase)
///
/// Game `i` uses seed `base + i`; the participant passed first moves first
/// in even-numbered games, the other in odd-numbered ones. Sequential and
/// parallel runs give identical results.
pub fn play_match(
    first: &StrategyConfig,
    second: &StrategyConfig,
    config: &MatchConfig,
) -> Result<MatchResult> {
    play_match_with_progress(first, second, config, |_| {})
}

/// Like [`play_match`], calling `on_game` once per finished game
pub fn play_match_with_progress<F>(
    first: &StrategyConfig,
    second: &StrategyConfig,
    config: &MatchConfig,
    on_game: F,
) -> Result<MatchResult>
where
    F: Fn(&GameOutcome) + Sync,
{
    if first.name == second.name {
        bail!("both participants are named {}", first.name);
    }
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }

    tracing::info!(
        first = %first.name,
        second = %second.name,
        games = config.games,
        size = config.board_size,
        "Starting match"
    );

    let slots = prepare_game_slots(config.games);
    let play = |slot: &GameSlot| {
        let result = play_single_game(first, second, config, slot);
        if let Ok(owc) = &result {
            on_game(&owc.outcome);
        }
        result
    };

    let results = if config.parallel {
        slots.par_iter().map(play).collect::<Result<Vec<_>>>()?
    } else {
        slots.iter().map(play).collect::<Result<Vec<_>>>()?
    };

    let result = aggregate_results(results);
    tracing::info!(
        first_wins = result.first_wins,
        second_wins = result.second_wins,
        draws = result.draws,
        "Match finished"
    );
    Ok(result)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy)]
struct GameSlot {
    /// Whether the participant passed first moves first this game
    first_moves_first: bool,
    /// Game index (for seeding)
    game_index: usize,
}

/// Outcome with context about who moved first
struct GameOutcomeWithContext {
    outcome: GameOutcome,
    first_moved_first: bool,
}

fn prepare_game_slots(games: usize) -> Vec<GameSlot> {
    (0..games)
        .map(|i| GameSlot {
            first_moves_first: i % 2 == 0,
            game_index: i,
        })
        .collect()
}

fn play_single_game(
    first: &StrategyConfig,
    second: &StrategyConfig,
    config: &MatchConfig,
    slot: &GameSlot,
) -> Result<GameOutcomeWithContext> {
    let seed = config.base_seed().wrapping_add(slot.game_index as u64);
    let mut runner = GameRunner::new(config.board_size, seed);

    let outcome = if slot.first_moves_first {
        runner.play_game(first, second)?
    } else {
        runner.play_game(second, first)?
    };

    Ok(GameOutcomeWithContext {
        outcome,
        first_moved_first: slot.first_moves_first,
    })
}

/// Aggregate game outcomes into a match result
fn aggregate_results(outcomes: Vec<GameOutcomeWithContext>) -> MatchResult {
    let mut first_wins = 0u32;
    let mut second_wins = 0u32;
    let mut draws = 0u32;
    let mut total_turns = 0usize;
    let mut game_outcomes = Vec::with_capacity(outcomes.len());

    for owc in outcomes {
        total_turns += owc.outcome.turns;

        // The runner always seats the side moving first on X
        let first_mark = if owc.first_moved_first {
            Mark::X
        } else {
            Mark::O
        };
        match owc.outcome.winner() {
            Some(mark) if mark == first_mark => first_wins += 1,
            Some(_) => second_wins += 1,
            None => draws += 1,
        }

        game_outcomes.push(owc.outcome);
    }

    let games_played = game_outcomes.len() as u32;
    let avg_turns = if games_played > 0 {
        total_turns as f32 / games_played as f32
    } else {
        0.0
    };

    MatchResult {
        first_wins,
        second_wins,
        draws,
        avg_turns,
        games_played,
        game_outcomes,
    }
}
