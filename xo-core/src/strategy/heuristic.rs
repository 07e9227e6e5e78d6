//! Line-counting heuristic
//!
//! Every line still winnable by someone contributes one candidate per empty
//! cell and per possible claimant, tagged with the number of empty cells left
//! in that line. The strategy then walks distances from 1 upward: at each
//! distance it plays its own most-voted cell if it has one, otherwise the
//! opponent's most-voted cell (a block). It never looks past single lines, so
//! double threats go unnoticed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use super::random::random_empty_cell;
use crate::board::{Board, Coordinate, Mark};
use crate::error::StrategyError;
use crate::lines::{WinLine, WinLines};

/// Greedy one-ply strategy preferring short own wins, then short blocks
#[derive(Clone, Debug)]
pub struct HeuristicStrategy {
    name: String,
    mark: Mark,
    rng: ChaCha8Rng,
}

impl HeuristicStrategy {
    pub fn new(name: impl Into<String>, mark: Mark, rng: ChaCha8Rng) -> Self {
        Self {
            name: name.into(),
            mark,
            rng,
        }
    }

    pub fn with_seed(name: impl Into<String>, mark: Mark, seed: u64) -> Self {
        Self::new(name, mark, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn next_move(
        &mut self,
        board: &Board,
        lines: &WinLines,
    ) -> Result<Coordinate, StrategyError> {
        if let Some(coord) = heuristic_move(board, lines, self.mark) {
            tracing::debug!(name = %self.name, mark = %self.mark, %coord, "heuristic move");
            return Ok(coord);
        }
        // Every line is dead; any empty cell is as good as another
        random_empty_cell(board, &mut self.rng)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

// ============================================================================
// CANDIDATES
// ============================================================================

/// A cell that would bring `claimant` closer to completing one line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    cell: Coordinate,
    claimant: Mark,
    steps_to_win: usize,
}

/// Candidates contributed by a single line; none if both marks occupy it
fn line_candidates(board: &Board, line: &WinLine, out: &mut Vec<Candidate>) {
    let mut owner: Option<Mark> = None;
    let mut free = Vec::with_capacity(line.len());

    for &coord in line.cells() {
        match board.get(coord) {
            None => free.push(coord),
            Some(mark) => match owner {
                None => owner = Some(mark),
                Some(existing) if existing != mark => return,
                Some(_) => {}
            },
        }
    }

    let claimants: &[Mark] = match owner {
        Some(Mark::X) => &[Mark::X],
        Some(Mark::O) => &[Mark::O],
        None => &Mark::ALL,
    };

    for &claimant in claimants {
        out.extend(free.iter().map(|&cell| Candidate {
            cell,
            claimant,
            steps_to_win: free.len(),
        }));
    }
}

fn collect_candidates(board: &Board, lines: &WinLines) -> Vec<Candidate> {
    let mut out = Vec::new();
    for line in lines {
        line_candidates(board, line, &mut out);
    }
    out
}

/// Most frequent cell; ties go to the cell seen first
fn most_voted<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Option<Coordinate> {
    let mut votes: FxHashMap<Coordinate, usize> = FxHashMap::default();
    let mut order = Vec::new();

    for candidate in candidates {
        let count = votes.entry(candidate.cell).or_insert(0);
        if *count == 0 {
            order.push(candidate.cell);
        }
        *count += 1;
    }

    let mut best: Option<(Coordinate, usize)> = None;
    for cell in order {
        let count = votes[&cell];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((cell, count));
        }
    }
    best.map(|(cell, _)| cell)
}

/// The heuristic's choice for `mark`, or `None` when no line is winnable
pub fn heuristic_move(board: &Board, lines: &WinLines, mark: Mark) -> Option<Coordinate> {
    let candidates = collect_candidates(board, lines);
    let max_steps = lines.max_len();

    let candidates = &candidates;
    for steps in 1..=max_steps {
        let at_distance = move |claimant: Mark| {
            candidates
                .iter()
                .filter(move |c| c.claimant == claimant && c.steps_to_win == steps)
        };

        if let Some(cell) = most_voted(at_distance(mark)) {
            return Some(cell);
        }
        if let Some(cell) = most_voted(at_distance(mark.opponent())) {
            return Some(cell);
        }
    }

    None
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
    fn test_dead_line_has_no_candidates() {
        let lines = generate(3).unwrap();
        let board = board_with(3, &[(0, 0, Mark::X), (1, 0, Mark::O)]);
        let row0 = lines
            .iter()
            .find(|l| l.cells().iter().all(|c| c.row == 0))
            .unwrap();

        let mut out = Vec::new();
        line_candidates(&board, row0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_line_counts_for_both_marks() {
        let lines = generate(3).unwrap();
        let board = Board::new(3).unwrap();
        let line = lines.iter().next().unwrap();

        let mut out = Vec::new();
        line_candidates(&board, line, &mut out);
        assert_eq!(out.len(), 6);
        assert_eq!(out.iter().filter(|c| c.claimant == Mark::X).count(), 3);
        assert!(out.iter().all(|c| c.steps_to_win == 3));
    }

    #[test]
    fn test_empty_board_prefers_center() {
        // Center lies on four lines, more than any other cell
        let lines = generate(3).unwrap();
        let board = Board::new(3).unwrap();
        assert_eq!(
            heuristic_move(&board, &lines, Mark::X),
            Some(Coordinate::new(1, 1))
        );
    }

    #[test]
    fn test_blocks_when_no_own_threat() {
        let lines = generate(3).unwrap();
        let board = board_with(3, &[(0, 0, Mark::X), (0, 1, Mark::X), (1, 1, Mark::O)]);
        assert_eq!(
            heuristic_move(&board, &lines, Mark::O),
            Some(Coordinate::new(0, 2))
        );
    }

    #[test]
    fn test_own_win_beats_block_at_same_distance() {
        let lines = generate(4).unwrap();
        // X needs (3, 0) for row 0, O needs (3, 3) for row 3
        let board = board_with(
            4,
            &[
                (0, 0, Mark::X),
                (1, 0, Mark::X),
                (2, 0, Mark::X),
                (0, 3, Mark::O),
                (1, 3, Mark::O),
                (2, 3, Mark::O),
            ],
        );
        assert_eq!(
            heuristic_move(&board, &lines, Mark::O),
            Some(Coordinate::new(3, 3))
        );
        assert_eq!(
            heuristic_move(&board, &lines, Mark::X),
            Some(Coordinate::new(3, 0))
        );
    }

    #[test]
    fn test_all_lines_dead() {
        let lines = generate(2).unwrap();
        let board = board_with(2, &[(0, 0, Mark::X), (1, 1, Mark::X), (1, 0, Mark::O), (0, 1, Mark::O)]);
        assert_eq!(heuristic_move(&board, &lines, Mark::X), None);
    }

    #[test]
    fn test_falls_back_to_random_cell() {
        // Lines all dead but one cell left: the fallback must still pick it
        let lines = generate(3).unwrap();
        let board = board_with(
            3,
            &[
                (0, 0, Mark::X),
                (1, 0, Mark::O),
                (2, 0, Mark::X),
                (0, 1, Mark::X),
                (1, 1, Mark::O),
                (2, 1, Mark::O),
                (0, 2, Mark::O),
                (1, 2, Mark::X),
            ],
        );
        assert_eq!(heuristic_move(&board, &lines, Mark::X), None);

        let mut strategy = HeuristicStrategy::with_seed("h", Mark::X, 5);
        assert_eq!(
            strategy.next_move(&board, &lines),
            Ok(Coordinate::new(2, 2))
        );
    }
}
