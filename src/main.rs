//! Goban-Rust: a Go rules engine with a Monte Carlo score estimator.
//!
//! ## Usage
//!
//! - `goban-rust` - Show a demo
//! - `goban-rust console` - Drive a game from stdin
//! - `goban-rust score --moves 20` - Score a random opening
//! - `goban-rust demo` - Capture, ko, and scoring walkthrough

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fastrand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use goban_rust::board::{Color, Move, Position};
use goban_rust::console::{Console, parse_board_size};
use goban_rust::constants::{DEFAULT_BOARD_SIZE, N_PLAYOUTS};
use goban_rust::game::Game;
use goban_rust::playout::Scorer;
use goban_rust::state::GameState;

/// Goban-Rust: a Go rules engine with a Monte Carlo score estimator
#[derive(Parser)]
#[command(name = "goban-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size (NxN)
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, value_parser = parse_board_size, global = true)]
    size: usize,

    /// Playouts per score estimate
    #[arg(long, default_value_t = N_PLAYOUTS, global = true)]
    playouts: usize,

    /// Worker threads for playouts
    #[arg(long, default_value_t = 1, global = true)]
    threads: usize,

    /// Seed for reproducible playouts
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin and answer on stdout
    Console,
    /// Play random legal moves from the empty board, then score the result
    Score {
        /// Number of random moves to play before scoring
        #[arg(long, default_value_t = 0)]
        moves: usize,
    },
    /// Run a short walkthrough of the engine
    Demo,
}

impl Cli {
    fn scorer(&self) -> Scorer {
        let scorer = match self.seed {
            Some(seed) => Scorer::with_seed(seed),
            None => Scorer::new(),
        };
        scorer.playouts(self.playouts).threads(self.threads)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Console) => {
            let mut console = Console::with_scorer(cli.size, cli.scorer());
            console.run(io::stdin().lock(), io::stdout().lock())
        }
        Some(Commands::Score { moves }) => run_score(&cli, *moves),
        Some(Commands::Demo) | None => run_demo(&cli),
    }
}

fn run_score(cli: &Cli, moves: usize) -> Result<()> {
    let mut rng = cli.seed.map_or_else(Rng::new, Rng::with_seed);
    let mut game = Game::new(cli.size);

    for _ in 0..moves {
        let state = game.get_current_game_state();
        let legal: Vec<Position> = state
            .get_empty_positions()
            .into_iter()
            .filter(|&pos| state.is_valid_move(pos, Some(&game)))
            .collect();
        let mv = if legal.is_empty() {
            Move::Pass
        } else {
            Move::Play(legal[rng.usize(..legal.len())])
        };
        game.register_move(mv)?;
    }

    let state = game.get_current_game_state();
    info!(moves, size = cli.size, "scoring random opening");
    println!("{state}{} to move", state.turn());

    let mut scorer = cli.scorer();
    println!("Black winning chances: {}", scorer.score(state));
    println!("Black covers most of the board: {}%", scorer.winning_chance(state));
    Ok(())
}

fn run_demo(cli: &Cli) -> Result<()> {
    println!("Goban-Rust: Go Rules Engine\n");

    // Demo 1: capture on a small board
    println!("=== Capture Demo ===");
    let mut state = GameState::new(3, Color::Black);
    for pos in [Position::new(1, 0), Position::new(0, 1), Position::new(1, 2)] {
        state.set(pos, Color::Black)?;
    }
    state.set(Position::new(1, 1), Color::White)?;
    println!("{state}");
    let captured = state.play_move(Position::new(2, 1))?;
    println!("Black plays (2,1):\n{captured}");

    // Demo 2: ko on a 5x5 game
    println!("=== Ko Demo ===");
    let mut game = Game::new(5);
    let moves = [(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2), (4, 4), (1, 1), (2, 1)];
    for (x, y) in moves {
        game.register_move(Position::new(x, y))
            .with_context(|| format!("demo move ({x},{y})"))?;
    }
    let state = game.get_current_game_state();
    println!("{state}");
    let retake = Position::new(1, 1);
    println!(
        "White retakes at {retake}: legal = {}\n",
        state.is_valid_move(retake, Some(&game))
    );

    // Demo 3: score estimate
    println!("=== Score Demo ===");
    let empty = GameState::new(cli.size, Color::Black);
    let report = cli.scorer().score(&empty);
    println!("Black winning chances on an empty {0}x{0} board: {report}", cli.size);
    Ok(())
}
