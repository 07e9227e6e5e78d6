//! Play command - one game on the console
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), play_turns(), report_outcome()
//! - Level 3: build_player()
//! - Level 4: configuration

use std::io::{self, BufReader, Stdin, Stdout};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use xo_core::{GameLoop, GameState, Mark, Outcome, Strategy, StrategyKind, DEFAULT_DEPTH};

use crate::human::{ConsoleSource, SharedSource};

type Console = SharedSource<ConsoleSource<BufReader<Stdin>, Stdout>>;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Player for X: random, heuristic, lookahead or human
    #[arg(long, default_value = "human")]
    pub x: StrategyKind,

    /// Player for O: random, heuristic, lookahead or human
    #[arg(long, default_value = "heuristic")]
    pub o: StrategyKind,

    /// Board side length
    #[arg(long, default_value_t = 3)]
    pub size: usize,

    /// Search depth for lookahead players
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Let O make the first move
    #[arg(long)]
    pub o_first: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(x = %args.x, o = %args.o, size = args.size, seed, "Starting play");

    let mut game = setup_game(&args, seed)?;
    let outcome = play_turns(&mut game)?;
    report_outcome(&game, outcome);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn setup_game(args: &PlayArgs, seed: u64) -> Result<GameLoop> {
    let needs_console = [args.x, args.o].contains(&StrategyKind::Interactive);
    let console = needs_console.then(|| {
        SharedSource::new(ConsoleSource::new(BufReader::new(io::stdin()), io::stdout()))
    });

    let x = build_player(args.x, Mark::X, args.depth, seed, console.as_ref())?;
    let o = build_player(args.o, Mark::O, args.depth, seed.wrapping_add(1), console.as_ref())?;
    let (first, second) = if args.o_first { (o, x) } else { (x, o) };

    GameLoop::new(first, second, args.size).context("Invalid game setup")
}

/// Print the board before every move until the game ends
fn play_turns(game: &mut GameLoop) -> Result<Outcome> {
    println!("Let's play");

    while let GameState::AwaitingMove(mark) = game.state() {
        print!("{}", game.board());
        println!("------------------------------");
        println!("{} ({mark}): next step", game.strategy(mark).name());

        game.step()?;
    }

    game.outcome().ok_or_else(|| anyhow!("game stopped before a result"))
}

fn report_outcome(game: &GameLoop, outcome: Outcome) {
    print!("{}", game.board());
    match outcome {
        Outcome::Won(mark) => println!("{} wins", game.strategy(mark).name()),
        Outcome::Drawn => println!("Draw"),
    }
    println!("Turns: {}", game.turns());
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_player(
    kind: StrategyKind,
    mark: Mark,
    depth: usize,
    seed: u64,
    console: Option<&Console>,
) -> Result<Strategy> {
    let name = format!("Player {mark}");

    if kind == StrategyKind::Interactive {
        let console = console.ok_or_else(|| anyhow!("no console for human player"))?;
        return Ok(Strategy::interactive(name, mark, console.clone()));
    }

    Strategy::automated(kind, name, mark, depth, ChaCha8Rng::seed_from_u64(seed))
        .ok_or_else(|| anyhow!("{kind} cannot be automated"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(x: StrategyKind, o: StrategyKind) -> PlayArgs {
        PlayArgs {
            x,
            o,
            size: 3,
            depth: 3,
            o_first: false,
        }
    }

    #[test]
    fn test_setup_automated_game() {
        let game = setup_game(&args(StrategyKind::Random, StrategyKind::Lookahead), 1).unwrap();
        assert_eq!(game.state(), GameState::AwaitingMove(Mark::X));
        assert_eq!(game.strategy(Mark::O).kind(), StrategyKind::Lookahead);
        assert_eq!(game.strategy(Mark::X).name(), "Player X");
    }

    #[test]
    fn test_o_first() {
        let mut a = args(StrategyKind::Heuristic, StrategyKind::Random);
        a.o_first = true;
        let game = setup_game(&a, 1).unwrap();
        assert_eq!(game.state(), GameState::AwaitingMove(Mark::O));
    }

    #[test]
    fn test_invalid_size() {
        let mut a = args(StrategyKind::Random, StrategyKind::Random);
        a.size = 0;
        assert!(setup_game(&a, 1).is_err());
    }

    #[test]
    fn test_human_needs_console() {
        assert!(build_player(StrategyKind::Interactive, Mark::X, 3, 1, None).is_err());
    }
}
