//! Board geometry and persistent board state

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::lines::WinLines;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Grid coordinates: `column` first, `row` second
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub column: usize,
    pub row: usize,
}

impl Coordinate {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Check if this coordinate lies on a board of the given size
    pub fn is_within(&self, size: usize) -> bool {
        self.column < size && self.row < size
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// A side's token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub const ALL: [Mark; 2] = [Mark::X, Mark::O];

    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

impl FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Mark::X),
            "o" | "O" => Ok(Mark::O),
            other => Err(format!("unknown mark: {other}")),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Immutable N×N grid of cells.
///
/// Cells are stored row-major. `place` never touches the receiver; it clones
/// the cells and returns a new board, so earlier boards stay valid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Mark>>,
}

impl Board {
    /// Create an empty board. Fails for size 0.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Mark at `coord`, or `None` if the cell is empty
    pub fn mark_at(&self, coord: Coordinate) -> Result<Option<Mark>, BoardError> {
        let index = self.index_of(coord)?;
        Ok(self.cells[index])
    }

    /// Return a new board with `mark` placed at `coord`
    pub fn place(&self, coord: Coordinate, mark: Mark) -> Result<Board, BoardError> {
        let index = self.index_of(coord)?;
        if let Some(existing) = self.cells[index] {
            return Err(BoardError::Occupied {
                coord,
                mark: existing,
            });
        }

        let mut next = self.clone();
        next.cells[index] = Some(mark);
        Ok(next)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, Option<Mark>)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, mark)| (Coordinate::new(i % size, i / size), *mark))
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Coordinate> {
        self.cells()
            .filter(|(_, mark)| mark.is_none())
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Occupied cells in row-major order
    pub fn occupied_cells(&self) -> Vec<Coordinate> {
        self.cells()
            .filter(|(_, mark)| mark.is_some())
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// True iff some line is entirely held by `mark`
    pub fn has_won(&self, mark: Mark, lines: &WinLines) -> bool {
        lines.iter().any(|line| {
            line.cells()
                .iter()
                .all(|&coord| self.get(coord) == Some(mark))
        })
    }

    /// The mark that has completed a line, if any
    pub fn winner(&self, lines: &WinLines) -> Option<Mark> {
        Mark::ALL
            .into_iter()
            .find(|&mark| self.has_won(mark, lines))
    }

    /// Unchecked lookup for coordinates already known to be in bounds.
    /// Out-of-grid coordinates read as empty.
    pub(crate) fn get(&self, coord: Coordinate) -> Option<Mark> {
        if coord.is_within(self.size) {
            self.cells[coord.row * self.size + coord.column]
        } else {
            None
        }
    }

    fn index_of(&self, coord: Coordinate) -> Result<usize, BoardError> {
        if coord.is_within(self.size) {
            Ok(coord.row * self.size + coord.column)
        } else {
            Err(BoardError::InvalidCoordinate {
                coord,
                size: self.size,
            })
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for column in 0..self.size {
                f.write_str("|")?;
                match self.get(Coordinate::new(column, row)) {
                    Some(mark) => write!(f, "{mark}")?,
                    None => f.write_str(" ")?,
                }
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::generate;

    #[test]
    fn test_coordinate_equality() {
        assert_eq!(Coordinate::new(1, 1), Coordinate::new(1, 1));
        assert_ne!(Coordinate::new(1, 1), Coordinate::new(2, 1));
        assert_ne!(Coordinate::new(1, 1), Coordinate::new(1, 2));
    }

    #[test]
    fn test_mark_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
        for mark in Mark::ALL {
            assert_eq!(mark.opponent().opponent(), mark);
        }
    }

    #[test]
    fn test_mark_parse() {
        assert_eq!("x".parse::<Mark>(), Ok(Mark::X));
        assert_eq!(" O ".parse::<Mark>(), Ok(Mark::O));
        assert!("z".parse::<Mark>().is_err());
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(3).unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.empty_cells().len(), 9);
        assert!(board.occupied_cells().is_empty());
        assert!(!board.is_full());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(Board::new(0), Err(BoardError::InvalidSize(0)));
    }

    #[test]
    fn test_place_returns_new_board() {
        let board = Board::new(3).unwrap();
        let next = board.place(Coordinate::new(1, 2), Mark::X).unwrap();

        assert_eq!(next.mark_at(Coordinate::new(1, 2)), Ok(Some(Mark::X)));
        assert_eq!(board.mark_at(Coordinate::new(1, 2)), Ok(None));
        assert_eq!(next.occupied_cells(), vec![Coordinate::new(1, 2)]);
    }

    #[test]
    fn test_place_occupied() {
        let board = Board::new(3)
            .unwrap()
            .place(Coordinate::new(0, 0), Mark::O)
            .unwrap();
        let before = board.clone();

        let err = board.place(Coordinate::new(0, 0), Mark::X).unwrap_err();
        assert_eq!(
            err,
            BoardError::Occupied {
                coord: Coordinate::new(0, 0),
                mark: Mark::O
            }
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new(2).unwrap();
        assert!(matches!(
            board.mark_at(Coordinate::new(2, 0)),
            Err(BoardError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            board.place(Coordinate::new(0, 5), Mark::X),
            Err(BoardError::InvalidCoordinate { size: 2, .. })
        ));
    }

    #[test]
    fn test_row_major_order() {
        let board = Board::new(2).unwrap();
        assert_eq!(
            board.empty_cells(),
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_has_won_and_winner() {
        let lines = generate(3).unwrap();
        let mut board = Board::new(3).unwrap();
        for row in 0..3 {
            board = board.place(Coordinate::new(1, row), Mark::O).unwrap();
        }
        assert!(board.has_won(Mark::O, &lines));
        assert!(!board.has_won(Mark::X, &lines));
        assert_eq!(board.winner(&lines), Some(Mark::O));
    }

    #[test]
    fn test_display() {
        let board = Board::new(2)
            .unwrap()
            .place(Coordinate::new(1, 0), Mark::X)
            .unwrap()
            .place(Coordinate::new(0, 1), Mark::O)
            .unwrap();
        assert_eq!(board.to_string(), "| |X|\n|O| |\n");
    }
}
