//! Error types for board, strategy and game-loop operations

use crate::board::{Coordinate, Mark};

/// Rejected board construction or placement.
///
/// A placement that returns one of these leaves the board untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size must be greater than 0, got {0}")]
    InvalidSize(usize),

    #[error("coordinate {coord} is outside the {size}x{size} board")]
    InvalidCoordinate { coord: Coordinate, size: usize },

    #[error("coordinate {coord} is occupied by {mark}")]
    Occupied { coord: Coordinate, mark: Mark },
}

/// Failure to produce a move
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    /// Called on a full board; the game loop never does this
    #[error("no empty cells left to choose from")]
    NoEmptyCells,

    /// Unparsable interactive input, answered with a re-prompt
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("move input closed")]
    InputClosed,
}

/// Invalid game setup, detected before any move is requested
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("both strategies are bound to mark {0}")]
    DuplicateMark(Mark),

    #[error("both strategies are named {0:?}")]
    DuplicateName(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Fatal failure while running a game
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("strategy {name:?} failed: {source}")]
    Strategy {
        name: String,
        #[source]
        source: StrategyError,
    },

    #[error("strategy {name:?} produced {attempts} invalid moves in a row")]
    TooManyRejections { name: String, attempts: usize },

    #[error("game is already over")]
    Finished,
}
