//! Winning lines for an N×N board

use rustc_hash::FxHashSet;

use crate::board::Coordinate;
use crate::error::BoardError;

/// One way to win: every cell of a row, a column or a diagonal.
///
/// Cells are kept sorted, so two lines covering the same cells compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WinLine {
    cells: Vec<Coordinate>,
}

impl WinLine {
    fn new(mut cells: Vec<Coordinate>) -> Self {
        cells.sort_unstable_by_key(|c| (c.row, c.column));
        cells.dedup();
        Self { cells }
    }

    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.cells.contains(&coord)
    }
}

/// The full set of winning lines for one board size
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinLines {
    size: usize,
    lines: Vec<WinLine>,
}

impl WinLines {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WinLine> {
        self.lines.iter()
    }

    /// Longest line length (the board size for any non-empty set)
    pub fn max_len(&self) -> usize {
        self.lines.iter().map(WinLine::len).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a WinLines {
    type Item = &'a WinLine;
    type IntoIter = std::slice::Iter<'a, WinLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Generate every winning line for a board of `size`.
///
/// Order is rows, then columns, then the main and anti diagonal. Duplicate
/// lines are dropped, which only happens for size 1 where everything
/// collapses to the single cell.
pub fn generate(size: usize) -> Result<WinLines, BoardError> {
    if size == 0 {
        return Err(BoardError::InvalidSize(size));
    }

    let rows = (0..size).map(|i| (0..size).map(|j| Coordinate::new(j, i)).collect::<Vec<_>>());
    let columns = (0..size).map(|i| (0..size).map(|j| Coordinate::new(i, j)).collect::<Vec<_>>());
    let diagonals = [
        (0..size).map(|i| Coordinate::new(i, i)).collect::<Vec<_>>(),
        (0..size).map(|i| Coordinate::new(size - 1 - i, i)).collect::<Vec<_>>(),
    ];

    let mut seen = FxHashSet::default();
    let lines = rows
        .chain(columns)
        .chain(diagonals)
        .map(WinLine::new)
        .filter(|line| seen.insert(line.clone()))
        .collect();

    Ok(WinLines { size, lines })
}
