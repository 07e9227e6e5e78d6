//! Uniform random move selection

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Coordinate, Mark};
use crate::error::StrategyError;

/// Picks uniformly among the empty cells
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    name: String,
    mark: Mark,
    rng: ChaCha8Rng,
}

impl RandomStrategy {
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

    pub fn next_move(&mut self, board: &Board) -> Result<Coordinate, StrategyError> {
        random_empty_cell(board, &mut self.rng)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

/// Select an empty cell uniformly. Fails on a full board.
pub fn random_empty_cell<R: Rng + ?Sized>(
    board: &Board,
    rng: &mut R,
) -> Result<Coordinate, StrategyError> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return Err(StrategyError::NoEmptyCells);
    }
    let idx = rng.gen_range(0..empty.len());
    Ok(empty[idx])
}
