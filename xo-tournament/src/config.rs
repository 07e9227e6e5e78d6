//! Configuration types for match and tournament play
//!
//! Level 4 - Utilities and configuration

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use xo_core::{StrategyKind, DEFAULT_DEPTH};

/// Automated player types available to matches and tournaments
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// Uniform choice among empty cells
    #[default]
    Random,
    /// Line-counting heuristic
    Heuristic,
    /// Bounded lookahead search
    Lookahead,
}

impl PlayerType {
    pub const ALL: [PlayerType; 3] = [
        PlayerType::Random,
        PlayerType::Heuristic,
        PlayerType::Lookahead,
    ];
}

impl From<PlayerType> for StrategyKind {
    fn from(player_type: PlayerType) -> Self {
        match player_type {
            PlayerType::Random => StrategyKind::Random,
            PlayerType::Heuristic => StrategyKind::Heuristic,
            PlayerType::Lookahead => StrategyKind::Lookahead,
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&StrategyKind::from(*self), f)
    }
}

impl FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<StrategyKind>()? {
            StrategyKind::Random => Ok(PlayerType::Random),
            StrategyKind::Heuristic => Ok(PlayerType::Heuristic),
            StrategyKind::Lookahead => Ok(PlayerType::Lookahead),
            StrategyKind::Interactive => Err("interactive players cannot be automated".into()),
        }
    }
}

/// One automated participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Display name, unique within a match or tournament
    pub name: String,
    pub kind: PlayerType,
    /// Search depth, only read by lookahead players
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Mixed into every per-game seed of this participant
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "random".to_string(),
            kind: PlayerType::Random,
            depth: DEFAULT_DEPTH,
            seed: None,
        }
    }
}

impl StrategyConfig {
    pub fn new(name: impl Into<String>, kind: PlayerType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn random(name: impl Into<String>) -> Self {
        Self::new(name, PlayerType::Random)
    }

    pub fn heuristic(name: impl Into<String>) -> Self {
        Self::new(name, PlayerType::Heuristic)
    }

    pub fn lookahead(name: impl Into<String>) -> Self {
        Self::new(name, PlayerType::Lookahead)
    }

    /// Set search depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set seed salt
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// One participant per player type, named after the type
    pub fn default_roster() -> Vec<StrategyConfig> {
        PlayerType::ALL
            .iter()
            .map(|&kind| StrategyConfig::new(kind.to_string(), kind))
            .collect()
    }

    /// Load a participant list from a JSON array
    pub fn load_roster(path: &Path) -> Result<Vec<StrategyConfig>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster from {}", path.display()))?;
        let roster: Vec<StrategyConfig> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse roster from {}", path.display()))?;
        check_unique_names(&roster)?;
        Ok(roster)
    }
}

/// Reject participant lists where two entries share a name
pub fn check_unique_names(entries: &[StrategyConfig]) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if entries[..i].iter().any(|other| other.name == entry.name) {
            bail!("duplicate participant name: {}", entry.name);
        }
    }
    Ok(())
}

/// Settings for a series of games between two participants
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub board_size: usize,
    /// Number of games (even numbers give both sides the same count of first moves)
    pub games: usize,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed; game `i` uses `seed + i` (None = 42)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board_size: 3,
            games: 10,
            parallel: true,
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path, "match config")
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(42)
    }
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub board_size: usize,
    /// Number of games per pairing
    pub games_per_match: usize,
    /// Whether to run matches in parallel
    pub parallel: bool,
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            board_size: 3,
            games_per_match: 10,
            parallel: true,
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Create round-robin config with the given games per pairing
    pub fn round_robin(games_per_match: usize) -> Self {
        Self {
            games_per_match,
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json(path, "tournament config")
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Settings handed to each pairing
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            board_size: self.board_size,
            games: self.games_per_match,
            // Parallelism happens across pairings
            parallel: false,
            seed: self.seed,
        }
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {what} from {}", path.display()))
}
