//! Tournament execution - round-robin
//!
//! Level 1 - Orchestration and Level 2 - Phases

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{check_unique_names, StrategyConfig, TournamentConfig};
use crate::match_play::{play_match, MatchResult};

/// Standing of a participant in the tournament
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Index of the entry in the original list
    pub index: usize,
    pub name: String,
    /// Total score (wins + 0.5 * draws)
    pub score: f32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    /// Average game length in turns
    pub avg_turns: f32,
}

impl Standing {
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.games_played as f32
        }
    }

    /// Normalized score (0.0 to 1.0)
    pub fn normalized_score(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.score / self.games_played as f32
        }
    }
}

/// Result of a tournament
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentResult {
    /// Final standings sorted by score (descending)
    pub standings: Vec<Standing>,
    /// All match results, indexed by `[first_idx][second_idx]` with `first_idx < second_idx`
    pub match_results: Vec<Vec<Option<MatchResult>>>,
}

impl TournamentResult {
    /// Top of the standings
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    pub fn top_n(&self, n: usize) -> &[Standing] {
        &self.standings[..n.min(self.standings.len())]
    }

    /// Standing of the entry at `index` in the original list
    pub fn standing_for(&self, index: usize) -> Option<&Standing> {
        self.standings.iter().find(|s| s.index == index)
    }

    /// Result between two entries, seen from `a`
    pub fn match_between(&self, a: usize, b: usize) -> Option<MatchResult> {
        let (i, j) = (a.min(b), a.max(b));
        let result = self.match_results.get(i)?.get(j)?.as_ref()?;
        Some(if a == i { result.clone() } else { result.swapped() })
    }
}

/// Run a round-robin tournament (Level 1 orchestration)
///
/// Every unordered pair of entries plays one match.
pub fn run_tournament(
    entries: &[StrategyConfig],
    config: &TournamentConfig,
) -> Result<TournamentResult> {
    check_unique_names(entries)?;

    tracing::info!(
        entries = entries.len(),
        games_per_match = config.games_per_match,
        size = config.board_size,
        "Starting tournament"
    );

    let pairings = generate_round_robin_pairings(entries.len());
    let match_results = execute_all_matches(entries, &pairings, config)?;
    let standings = compute_standings(entries, &match_results);

    if let Some(top) = standings.first() {
        tracing::info!(winner = %top.name, score = top.score, "Tournament finished");
    }

    Ok(TournamentResult {
        standings,
        match_results,
    })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Generate all pairings for round-robin
fn generate_round_robin_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairings.push((i, j));
        }
    }
    pairings
}

/// Execute all matches for round-robin
fn execute_all_matches(
    entries: &[StrategyConfig],
    pairings: &[(usize, usize)],
    config: &TournamentConfig,
) -> Result<Vec<Vec<Option<MatchResult>>>> {
    let n = entries.len();
    let mut results: Vec<Vec<Option<MatchResult>>> = vec![vec![None; n]; n];
    let match_config = config.match_config();

    let execute = |&(i, j): &(usize, usize)| {
        play_match(&entries[i], &entries[j], &match_config).map(|result| ((i, j), result))
    };

    let match_results: Vec<((usize, usize), MatchResult)> = if config.parallel {
        pairings.par_iter().map(execute).collect::<Result<_>>()?
    } else {
        pairings.iter().map(execute).collect::<Result<_>>()?
    };

    for ((i, j), result) in match_results {
        results[i][j] = Some(result);
    }

    Ok(results)
}

/// Compute final standings from match results
fn compute_standings(
    entries: &[StrategyConfig],
    results: &[Vec<Option<MatchResult>>],
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let (wins, losses, draws, games, total_turns) = compute_record(i, results);
            let avg_turns = if games > 0 {
                total_turns / games as f32
            } else {
                0.0
            };

            Standing {
                index: i,
                name: entry.name.clone(),
                score: wins as f32 + 0.5 * draws as f32,
                wins,
                losses,
                draws,
                games_played: games,
                avg_turns,
            }
        })
        .collect();

    // Score, then wins, both descending; stable sort keeps entry order on ties
    standings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.wins.cmp(&a.wins))
    });

    standings
}

/// Compute win/loss/draw record for a participant
fn compute_record(player: usize, results: &[Vec<Option<MatchResult>>]) -> (u32, u32, u32, u32, f32) {
    let n = results.len();
    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut draws = 0u32;
    let mut games = 0u32;
    let mut total_turns = 0f32;

    for opponent in 0..n {
        if player == opponent {
            continue;
        }

        if let Some(ref result) = results[player][opponent] {
            wins += result.first_wins;
            losses += result.second_wins;
            draws += result.draws;
            games += result.games_played;
            total_turns += result.avg_turns * result.games_played as f32;
        }

        if let Some(ref result) = results[opponent][player] {
            wins += result.second_wins;
            losses += result.first_wins;
            draws += result.draws;
            games += result.games_played;
            total_turns += result.avg_turns * result.games_played as f32;
        }
    }

    (wins, losses, draws, games, total_turns)
}
