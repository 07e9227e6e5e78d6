//! Moves supplied from outside the engine

use std::collections::VecDeque;
use std::fmt;

use crate::board::{Board, Coordinate, Mark};
use crate::error::StrategyError;

/// External provider of moves, e.g. a console prompt.
///
/// `MalformedInput` is answered with a re-prompt by the game loop;
/// `InputClosed` ends the game with an error.
pub trait MoveSource {
    fn read_move(&mut self, board: &Board, mark: Mark) -> Result<Coordinate, StrategyError>;
}

/// Strategy that forwards every decision to a `MoveSource`
pub struct InteractiveStrategy {
    name: String,
    mark: Mark,
    source: Box<dyn MoveSource + Send>,
}

impl InteractiveStrategy {
    pub fn new(
        name: impl Into<String>,
        mark: Mark,
        source: impl MoveSource + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            mark,
            source: Box::new(source),
        }
    }

    pub fn next_move(&mut self, board: &Board) -> Result<Coordinate, StrategyError> {
        if board.is_full() {
            return Err(StrategyError::NoEmptyCells);
        }
        self.source.read_move(board, self.mark)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

impl fmt::Debug for InteractiveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveStrategy")
            .field("name", &self.name)
            .field("mark", &self.mark)
            .finish_non_exhaustive()
    }
}

/// Replays a fixed list of inputs, then reports the input as closed.
///
/// `Err` entries stand for lines that failed to parse.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    inputs: VecDeque<Result<Coordinate, String>>,
}

impl ScriptedSource {
    pub fn new(moves: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            inputs: moves.into_iter().map(Ok).collect(),
        }
    }

    /// Queue an unparsable input
    pub fn then_malformed(mut self, raw: impl Into<String>) -> Self {
        self.inputs.push_back(Err(raw.into()));
        self
    }

    pub fn then(mut self, coord: Coordinate) -> Self {
        self.inputs.push_back(Ok(coord));
        self
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl MoveSource for ScriptedSource {
    fn read_move(&mut self, _board: &Board, _mark: Mark) -> Result<Coordinate, StrategyError> {
        match self.inputs.pop_front() {
            Some(Ok(coord)) => Ok(coord),
            Some(Err(raw)) => Err(StrategyError::MalformedInput(raw)),
            None => Err(StrategyError::InputClosed),
        }
    }
}
