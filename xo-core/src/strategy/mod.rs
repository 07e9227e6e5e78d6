//! Move-selection strategies
//!
//! Every strategy is bound to one mark and a display name, and derives its
//! move from the board it is handed. Randomness comes from a `ChaCha8Rng`
//! owned by the strategy, so a fixed seed gives a fixed game.
//!
//! - `Random`: uniform choice among empty cells
//! - `Heuristic`: line-counting one-ply heuristic
//! - `Lookahead`: bounded search over self-move sequences
//! - `Interactive`: moves read from an external `MoveSource`

mod heuristic;
mod interactive;
mod lookahead;
mod random;

use std::fmt;
use std::str::FromStr;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Coordinate, Mark};
use crate::error::StrategyError;
use crate::lines::WinLines;

pub use heuristic::{heuristic_move, HeuristicStrategy};
pub use interactive::{InteractiveStrategy, MoveSource, ScriptedSource};
pub use lookahead::{lookahead_move, LookaheadStrategy, DEFAULT_DEPTH};
pub use random::{random_empty_cell, RandomStrategy};

/// Which variant a strategy is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Random,
    Heuristic,
    Lookahead,
    Interactive,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Random => "random",
            StrategyKind::Heuristic => "heuristic",
            StrategyKind::Lookahead => "lookahead",
            StrategyKind::Interactive => "interactive",
        };
        f.write_str(name)
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "heuristic" => Ok(StrategyKind::Heuristic),
            "lookahead" => Ok(StrategyKind::Lookahead),
            "interactive" | "human" => Ok(StrategyKind::Interactive),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// A player: one of a fixed set of move-selection variants
pub enum Strategy {
    Random(RandomStrategy),
    Heuristic(HeuristicStrategy),
    Lookahead(LookaheadStrategy),
    Interactive(InteractiveStrategy),
}

impl Strategy {
    pub fn random(name: impl Into<String>, mark: Mark, seed: u64) -> Self {
        Strategy::Random(RandomStrategy::with_seed(name, mark, seed))
    }

    pub fn heuristic(name: impl Into<String>, mark: Mark, seed: u64) -> Self {
        Strategy::Heuristic(HeuristicStrategy::with_seed(name, mark, seed))
    }

    pub fn lookahead(name: impl Into<String>, mark: Mark, depth: usize, seed: u64) -> Self {
        Strategy::Lookahead(LookaheadStrategy::with_seed(name, mark, depth, seed))
    }

    pub fn interactive(
        name: impl Into<String>,
        mark: Mark,
        source: impl MoveSource + Send + 'static,
    ) -> Self {
        Strategy::Interactive(InteractiveStrategy::new(name, mark, source))
    }

    /// Build an automated strategy of `kind` around an explicit rng.
    ///
    /// Returns `None` for `Interactive`, which needs a move source instead.
    pub fn automated(
        kind: StrategyKind,
        name: impl Into<String>,
        mark: Mark,
        depth: usize,
        rng: ChaCha8Rng,
    ) -> Option<Self> {
        match kind {
            StrategyKind::Random => Some(Strategy::Random(RandomStrategy::new(name, mark, rng))),
            StrategyKind::Heuristic => {
                Some(Strategy::Heuristic(HeuristicStrategy::new(name, mark, rng)))
            }
            StrategyKind::Lookahead => Some(Strategy::Lookahead(LookaheadStrategy::new(
                name, mark, depth, rng,
            ))),
            StrategyKind::Interactive => None,
        }
    }

    /// Choose the next move for the bound mark
    pub fn next_move(
        &mut self,
        board: &Board,
        lines: &WinLines,
    ) -> Result<Coordinate, StrategyError> {
        match self {
            Strategy::Random(s) => s.next_move(board),
            Strategy::Heuristic(s) => s.next_move(board, lines),
            Strategy::Lookahead(s) => s.next_move(board, lines),
            Strategy::Interactive(s) => s.next_move(board),
        }
    }

    pub fn mark(&self) -> Mark {
        match self {
            Strategy::Random(s) => s.mark(),
            Strategy::Heuristic(s) => s.mark(),
            Strategy::Lookahead(s) => s.mark(),
            Strategy::Interactive(s) => s.mark(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Strategy::Random(s) => s.name(),
            Strategy::Heuristic(s) => s.name(),
            Strategy::Lookahead(s) => s.name(),
            Strategy::Interactive(s) => s.name(),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Random(_) => StrategyKind::Random,
            Strategy::Heuristic(_) => StrategyKind::Heuristic,
            Strategy::Lookahead(_) => StrategyKind::Lookahead,
            Strategy::Interactive(_) => StrategyKind::Interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Strategy::Interactive(_))
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("mark", &self.mark())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_kind_round_trip_through_str() {
        for kind in [
            StrategyKind::Random,
            StrategyKind::Heuristic,
            StrategyKind::Lookahead,
            StrategyKind::Interactive,
        ] {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        }
        assert_eq!("Human".parse::<StrategyKind>(), Ok(StrategyKind::Interactive));
        assert!("minimax".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_accessors() {
        let s = Strategy::lookahead("deep", Mark::O, 3, 7);
        assert_eq!(s.name(), "deep");
        assert_eq!(s.mark(), Mark::O);
        assert_eq!(s.kind(), StrategyKind::Lookahead);
        assert!(!s.is_interactive());
    }

    #[test]
    fn test_automated_rejects_interactive() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        assert!(Strategy::automated(StrategyKind::Interactive, "h", Mark::X, 0, rng).is_none());

        let rng = ChaCha8Rng::seed_from_u64(1);
        let s = Strategy::automated(StrategyKind::Heuristic, "h", Mark::X, 0, rng).unwrap();
        assert_eq!(s.kind(), StrategyKind::Heuristic);
    }
}
