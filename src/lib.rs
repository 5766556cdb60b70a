//! Goban-Rust: a Go rules engine with a Monte Carlo score estimator.
//!
//! The engine tracks stones, connected groups, liberties, and captures,
//! enforces suicide and ko, keeps an undoable game history, and estimates
//! Black's winning chances with uniformly random playouts.
//!
//! ## Modules
//!
//! - [`constants`] - Defaults, playout parameters, and text glyphs
//! - [`board`] - Colours, coordinates, moves, and cells
//! - [`groups`] - Disjoint-set tracking of connected groups
//! - [`error`] - Board precondition failures
//! - [`state`] - Board snapshots and move legality
//! - [`game`] - Game history with undo/redo and export
//! - [`playout`] - Random playouts and score estimation
//! - [`console`] - Text controller for driving a game from stdin
//!
//! ## Example
//!
//! ```
//! use goban_rust::board::Position;
//! use goban_rust::game::Game;
//! use goban_rust::playout::Scorer;
//!
//! let mut game = Game::new(9);
//! let pos = Position::new(4, 4);
//!
//! // Validate first, then register
//! if game.get_current_game_state().is_valid_move(pos, Some(&game)) {
//!     game.register_move(pos).unwrap();
//! }
//!
//! let report = Scorer::with_seed(7).playouts(50).score(game.get_current_game_state());
//! println!("Black wins {report} of playouts");
//! ```

pub mod board;
pub mod console;
pub mod constants;
pub mod error;
pub mod game;
pub mod groups;
pub mod playout;
pub mod state;
