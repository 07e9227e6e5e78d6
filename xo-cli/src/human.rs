//! Console move source for human players
//!
//! Reads "column row" pairs, one per line, and writes prompts and
//! complaints to the given output.

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use xo_core::{Board, Coordinate, Mark, MoveSource, StrategyError};

/// Prompts on `W` and reads moves from `R`
pub struct ConsoleSource<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn prompt(&mut self, mark: Mark) -> Result<Option<String>, StrategyError> {
        write!(self.writer, "{mark} > type column and row: ").map_err(closed)?;
        self.writer.flush().map_err(closed)?;

        let mut line = String::new();
        match self.reader.read_line(&mut line).map_err(closed)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    fn say(&mut self, message: impl std::fmt::Display) -> Result<(), StrategyError> {
        writeln!(self.writer, "{message}").map_err(closed)
    }
}

impl<R: BufRead, W: Write> MoveSource for ConsoleSource<R, W> {
    fn read_move(&mut self, board: &Board, mark: Mark) -> Result<Coordinate, StrategyError> {
        let Some(line) = self.prompt(mark)? else {
            self.say("")?;
            return Err(StrategyError::InputClosed);
        };

        let Some(coord) = parse_coordinate(&line) else {
            self.say("wrong input, try again")?;
            return Err(StrategyError::MalformedInput(line.trim().to_string()));
        };

        // The game loop rejects the move as well; this only tells the player why
        if let Err(err) = board.place(coord, mark) {
            self.say(format_args!("wrong point, try again: {err}"))?;
        }
        Ok(coord)
    }
}

/// Hands one console to several players, e.g. two humans at one terminal
pub struct SharedSource<S>(Arc<Mutex<S>>);

impl<S> SharedSource<S> {
    pub fn new(source: S) -> Self {
        Self(Arc::new(Mutex::new(source)))
    }
}

impl<S> Clone for SharedSource<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: MoveSource> MoveSource for SharedSource<S> {
    fn read_move(&mut self, board: &Board, mark: Mark) -> Result<Coordinate, StrategyError> {
        let mut source = self.0.lock().map_err(|_| StrategyError::InputClosed)?;
        source.read_move(board, mark)
    }
}

/// Parse "column row"; anything else is malformed
fn parse_coordinate(line: &str) -> Option<Coordinate> {
    let mut parts = line.split_whitespace();
    let column = parts.next()?.parse().ok()?;
    let row = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Coordinate::new(column, row))
}

fn closed(err: std::io::Error) -> StrategyError {
    tracing::debug!(%err, "console unavailable");
    StrategyError::InputClosed
}
