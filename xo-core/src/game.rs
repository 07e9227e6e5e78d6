//! Turn loop between two strategies

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coordinate, Mark};
use crate::error::{ConfigError, GameError, StrategyError};
use crate::lines::{generate, WinLines};
use crate::strategy::Strategy;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Invalid moves tolerated from an automated strategy within one turn.
/// Interactive strategies are re-prompted without limit.
pub const MAX_AUTOMATED_REJECTIONS: usize = 16;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Where the game loop stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    AwaitingMove(Mark),
    Won(Mark),
    Drawn,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameState::AwaitingMove(_))
    }
}

/// Final result of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Won(Mark),
    Drawn,
}

impl Outcome {
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Won(mark) => Some(*mark),
            Outcome::Drawn => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Won(mark) => write!(f, "{mark} wins"),
            Outcome::Drawn => f.write_str("draw"),
        }
    }
}

/// One accepted move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub mark: Mark,
    pub coord: Coordinate,
}

// ============================================================================
// GAME LOOP
// ============================================================================

/// Alternates two strategies on one board until a win or a full board.
///
/// The strategy passed first moves first.
#[derive(Debug)]
pub struct GameLoop {
    strategies: [Strategy; 2],
    board: Board,
    lines: WinLines,
    state: GameState,
    history: Vec<Turn>,
}

impl GameLoop {
    /// Set up a game. Both strategies must hold different marks and names.
    pub fn new(first: Strategy, second: Strategy, board_size: usize) -> Result<Self, ConfigError> {
        if first.mark() == second.mark() {
            return Err(ConfigError::DuplicateMark(first.mark()));
        }
        if first.name() == second.name() {
            return Err(ConfigError::DuplicateName(first.name().to_string()));
        }

        let board = Board::new(board_size)?;
        let lines = generate(board_size)?;
        let state = GameState::AwaitingMove(first.mark());

        Ok(Self {
            strategies: [first, second],
            board,
            lines,
            state,
            history: Vec::with_capacity(board_size * board_size),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn lines(&self) -> &WinLines {
        &self.lines
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn turns(&self) -> usize {
        self.history.len()
    }

    /// Strategy bound to `mark`
    pub fn strategy(&self, mark: Mark) -> &Strategy {
        &self.strategies[self.seat_of(mark)]
    }

    /// Final outcome, once the game is over
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::AwaitingMove(_) => None,
            GameState::Won(mark) => Some(Outcome::Won(mark)),
            GameState::Drawn => Some(Outcome::Drawn),
        }
    }

    /// Play turns until the game ends
    pub fn run(&mut self) -> Result<Outcome, GameError> {
        tracing::info!(
            first = %self.strategies[0].name(),
            second = %self.strategies[1].name(),
            size = self.board.size(),
            "Starting game"
        );

        loop {
            self.step()?;
            if let Some(outcome) = self.outcome() {
                tracing::info!(%outcome, turns = self.turns(), "Game over");
                return Ok(outcome);
            }
        }
    }

    /// Play exactly one accepted move and return the new state.
    ///
    /// Rejected moves and malformed input re-prompt the same strategy
    /// without advancing the turn.
    pub fn step(&mut self) -> Result<GameState, GameError> {
        let GameState::AwaitingMove(active) = self.state else {
            return Err(GameError::Finished);
        };

        let (coord, next) = self.request_move(active)?;
        self.board = next;
        self.history.push(Turn {
            mark: active,
            coord,
        });

        tracing::debug!(turn = self.history.len(), mark = %active, %coord, "move placed");
        tracing::trace!("\n{}", self.board);

        self.state = if self.board.has_won(active, &self.lines) {
            GameState::Won(active)
        } else if self.board.is_full() {
            GameState::Drawn
        } else {
            GameState::AwaitingMove(active.opponent())
        };

        Ok(self.state)
    }

    /// Ask the active strategy until it yields a placeable move
    fn request_move(&mut self, active: Mark) -> Result<(Coordinate, Board), GameError> {
        let seat = self.seat_of(active);
        let mut rejections = 0;

        loop {
            let strategy = &mut self.strategies[seat];
            match strategy.next_move(&self.board, &self.lines) {
                Ok(coord) => match self.board.place(coord, active) {
                    Ok(next) => return Ok((coord, next)),
                    Err(err) => {
                        tracing::warn!(name = %strategy.name(), %err, "move rejected");
                    }
                },
                Err(StrategyError::MalformedInput(raw)) => {
                    tracing::warn!(name = %strategy.name(), input = %raw, "malformed input");
                }
                Err(source) => {
                    return Err(GameError::Strategy {
                        name: strategy.name().to_string(),
                        source,
                    });
                }
            }

            rejections += 1;
            if !strategy.is_interactive() && rejections >= MAX_AUTOMATED_REJECTIONS {
                return Err(GameError::TooManyRejections {
                    name: strategy.name().to_string(),
                    attempts: rejections,
                });
            }
        }
    }

    fn seat_of(&self, mark: Mark) -> usize {
        if self.strategies[0].mark() == mark {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ScriptedSource;

    fn scripted(name: &str, mark: Mark, source: ScriptedSource) -> Strategy {
        Strategy::interactive(name, mark, source)
    }

    #[test]
    fn test_initial_state() {
        let game = GameLoop::new(
            Strategy::random("a", Mark::O, 1),
            Strategy::random("b", Mark::X, 2),
            3,
        )
        .unwrap();
        assert_eq!(game.state(), GameState::AwaitingMove(Mark::O));
        assert_eq!(game.board().empty_cells().len(), 9);
        assert_eq!(game.lines().len(), 8);
        assert_eq!(game.outcome(), None);
        assert_eq!(game.strategy(Mark::X).name(), "b");
    }

    #[test]
    fn test_duplicate_mark_rejected() {
        let err = GameLoop::new(
            Strategy::random("a", Mark::X, 1),
            Strategy::heuristic("b", Mark::X, 2),
            3,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateMark(Mark::X));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = GameLoop::new(
            Strategy::random("same", Mark::X, 1),
            Strategy::random("same", Mark::O, 2),
            3,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName("same".into()));
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = GameLoop::new(
            Strategy::random("a", Mark::X, 1),
            Strategy::random("b", Mark::O, 2),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Board(_)));
    }

    #[test]
    fn test_scripted_win() {
        let x = ScriptedSource::new([
            Coordinate::new(0, 0),
            Coordinate::new(1, 0),
            Coordinate::new(2, 0),
        ]);
        let o = ScriptedSource::new([Coordinate::new(0, 1), Coordinate::new(1, 1)]);
        let mut game =
            GameLoop::new(scripted("x", Mark::X, x), scripted("o", Mark::O, o), 3).unwrap();

        assert_eq!(game.run(), Ok(Outcome::Won(Mark::X)));
        assert_eq!(game.turns(), 5);
        assert_eq!(game.state(), GameState::Won(Mark::X));
        assert_eq!(game.step(), Err(GameError::Finished));
    }

    #[test]
    fn test_invalid_moves_reprompt_same_player() {
        let x = ScriptedSource::new([Coordinate::new(0, 0), Coordinate::new(1, 1)]);
        let o = ScriptedSource::new([Coordinate::new(0, 0)])
            .then(Coordinate::new(7, 7))
            .then_malformed("one two")
            .then(Coordinate::new(2, 2));
        let mut game =
            GameLoop::new(scripted("x", Mark::X, x), scripted("o", Mark::O, o), 3).unwrap();

        assert_eq!(game.step(), Ok(GameState::AwaitingMove(Mark::O)));
        assert_eq!(game.step(), Ok(GameState::AwaitingMove(Mark::X)));
        assert_eq!(
            game.history()[1],
            Turn {
                mark: Mark::O,
                coord: Coordinate::new(2, 2)
            }
        );
        assert_eq!(game.turns(), 2);
    }

    #[test]
    fn test_closed_input_is_fatal() {
        let x = ScriptedSource::new([]);
        let o = ScriptedSource::new([]);
        let mut game =
            GameLoop::new(scripted("x", Mark::X, x), scripted("o", Mark::O, o), 3).unwrap();

        assert_eq!(
            game.run(),
            Err(GameError::Strategy {
                name: "x".into(),
                source: StrategyError::InputClosed
            })
        );
        assert_eq!(game.state(), GameState::AwaitingMove(Mark::X));
    }

    #[test]
    fn test_single_cell_board_first_mover_wins() {
        let mut game = GameLoop::new(
            Strategy::random("a", Mark::X, 1),
            Strategy::random("b", Mark::O, 2),
            1,
        )
        .unwrap();
        assert_eq!(game.run(), Ok(Outcome::Won(Mark::X)));
        assert_eq!(game.turns(), 1);
    }

    #[test]
    fn test_draw() {
        // X O X / X O O / O X X
        let x = ScriptedSource::new([
            Coordinate::new(0, 0),
            Coordinate::new(2, 0),
            Coordinate::new(0, 1),
            Coordinate::new(1, 2),
            Coordinate::new(2, 2),
        ]);
        let o = ScriptedSource::new([
            Coordinate::new(1, 0),
            Coordinate::new(1, 1),
            Coordinate::new(2, 1),
            Coordinate::new(0, 2),
        ]);
        let mut game =
            GameLoop::new(scripted("x", Mark::X, x), scripted("o", Mark::O, o), 3).unwrap();

        assert_eq!(game.run(), Ok(Outcome::Drawn));
        assert!(game.board().is_full());
        assert_eq!(game.outcome().and_then(|o| o.winner()), None);
    }
}
