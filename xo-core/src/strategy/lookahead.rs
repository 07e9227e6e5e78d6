//! Bounded lookahead over self-move sequences
//!
//! The search only ever places its own mark: it answers "how fast can I
//! finish a line if I keep playing", not a two-player minimax. The mark whose
//! win is checked alternates with depth (own mark on odd plies, opponent on
//! even plies) while the placed mark stays the same.
//!
//! Terminal sequences rank by length, then by ending (a tracked win before a
//! filled board). The best sequence yields its last step if it ended in an
//! opponent win, otherwise its first step.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::random::random_empty_cell;
use crate::board::{Board, Coordinate, Mark};
use crate::error::StrategyError;
use crate::lines::WinLines;

/// Default search depth in plies
pub const DEFAULT_DEPTH: usize = 5;

/// Depth-bounded search strategy
#[derive(Clone, Debug)]
pub struct LookaheadStrategy {
    name: String,
    mark: Mark,
    depth: usize,
    rng: ChaCha8Rng,
}

impl LookaheadStrategy {
    pub fn new(name: impl Into<String>, mark: Mark, depth: usize, rng: ChaCha8Rng) -> Self {
        Self {
            name: name.into(),
            mark,
            depth,
            rng,
        }
    }

    pub fn with_seed(name: impl Into<String>, mark: Mark, depth: usize, seed: u64) -> Self {
        Self::new(name, mark, depth, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn next_move(
        &mut self,
        board: &Board,
        lines: &WinLines,
    ) -> Result<Coordinate, StrategyError> {
        if let Some(coord) = lookahead_move(board, lines, self.mark, self.depth) {
            tracing::debug!(name = %self.name, mark = %self.mark, %coord, "lookahead move");
            return Ok(coord);
        }
        random_empty_cell(board, &mut self.rng)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// How a recorded sequence ended. Declaration order is rank order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Ending {
    /// The tracked mark completed a line
    Win,
    /// Board filled up without the tracked mark winning
    Exhausted,
}

/// A finished move sequence
#[derive(Clone, Debug)]
struct TerminalPath {
    steps: Vec<Coordinate>,
    tracked: Mark,
    ending: Ending,
}

impl TerminalPath {
    fn rank(&self) -> (usize, Ending) {
        (self.steps.len(), self.ending)
    }
}

struct Search<'a> {
    lines: &'a WinLines,
    placing: Mark,
    paths: Vec<TerminalPath>,
    /// Length of the shortest recorded path; longer branches cannot rank first
    shortest: usize,
}

impl Search<'_> {
    fn explore(
        &mut self,
        board: &Board,
        tracked: Mark,
        depth_left: usize,
        path: &mut Vec<Coordinate>,
    ) {
        if depth_left == 0 || path.len() >= self.shortest {
            return;
        }

        for coord in board.empty_cells() {
            let Ok(next) = board.place(coord, self.placing) else {
                continue;
            };
            path.push(coord);

            let ending = if next.has_won(tracked, self.lines) {
                Some(Ending::Win)
            } else if next.is_full() {
                Some(Ending::Exhausted)
            } else {
                None
            };

            match ending {
                Some(ending) => {
                    self.shortest = self.shortest.min(path.len());
                    self.paths.push(TerminalPath {
                        steps: path.clone(),
                        tracked,
                        ending,
                    });
                }
                None => self.explore(&next, tracked.opponent(), depth_left - 1, path),
            }

            path.pop();
        }
    }
}

/// The lookahead choice for `mark`, or `None` if no sequence finishes within `depth`
pub fn lookahead_move(
    board: &Board,
    lines: &WinLines,
    mark: Mark,
    depth: usize,
) -> Option<Coordinate> {
    let mut search = Search {
        lines,
        placing: mark,
        paths: Vec::new(),
        shortest: usize::MAX,
    };
    search.explore(board, mark, depth, &mut Vec::with_capacity(depth));

    // min_by_key keeps the first of equally ranked paths, i.e. search order
    let best = search.paths.iter().min_by_key(|p| p.rank())?;

    tracing::trace!(
        paths = search.paths.len(),
        length = best.steps.len(),
        ending = ?best.ending,
        "lookahead search finished"
    );

    if best.ending == Ending::Win && best.tracked == mark.opponent() {
        best.steps.last().copied()
    } else {
        best.steps.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::generate;

    fn board_with(size: usize, marks: &[(usize, usize, Mark)]) -> Board {
        marks
            .iter()
            .fold(Board::new(size).unwrap(), |board, &(c, r, m)| {
                board.place(Coordinate::new(c, r), m).unwrap()
            })
    }

    #[test]
    fn test_finishes_own_line() {
        let lines = generate(3).unwrap();
        let board = board_with(3, &[(0, 0, Mark::X), (1, 0, Mark::X), (0, 1, Mark::O)]);
        assert_eq!(
            lookahead_move(&board, &lines, Mark::X, DEFAULT_DEPTH),
            Some(Coordinate::new(2, 0))
        );
    }

    #[test]
    fn test_empty_board_opens_first_shortest_line() {
        // Three own moves complete row 0 first in search order
        let lines = generate(3).unwrap();
        let board = Board::new(3).unwrap();
        assert_eq!(
            lookahead_move(&board, &lines, Mark::O, 3),
            Some(Coordinate::new(0, 0))
        );
    }

    #[test]
    fn test_depth_too_shallow() {
        let lines = generate(3).unwrap();
        let board = Board::new(3).unwrap();
        assert_eq!(lookahead_move(&board, &lines, Mark::X, 2), None);
        assert_eq!(lookahead_move(&board, &lines, Mark::X, 0), None);
    }

    #[test]
    fn test_exhausted_board_returns_first_step() {
        // Two cells left and no line can be completed: every path ends by
        // filling the board
        let lines = generate(3).unwrap();
        let board = board_with(
            3,
            &[
                (0, 0, Mark::X),
                (1, 0, Mark::O),
                (2, 0, Mark::X),
                (0, 1, Mark::O),
                (1, 1, Mark::X),
                (2, 1, Mark::O),
                (1, 2, Mark::X),
            ],
        );
        // O placing at (0, 2) or (2, 2) cannot win; the first path in
        // search order starts at (0, 2)
        assert_eq!(
            lookahead_move(&board, &lines, Mark::O, DEFAULT_DEPTH),
            Some(Coordinate::new(0, 2))
        );
    }

    #[test]
    fn test_strategy_falls_back_to_random() {
        let lines = generate(3).unwrap();
        let board = Board::new(3).unwrap();
        let mut strategy = LookaheadStrategy::with_seed("l", Mark::X, 1, 11);
        let coord = strategy.next_move(&board, &lines).unwrap();
        assert!(board.empty_cells().contains(&coord));
        assert_eq!(strategy.depth(), 1);
    }
}
