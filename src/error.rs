use thiserror::Error;

use crate::board::{Color, Position};

/// Precondition failures from board mutators.
///
/// These indicate a caller bug: gate mutations behind
/// [`GameState::is_valid_move`](crate::state::GameState::is_valid_move).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid position {0}")]
    InvalidPosition(Position),

    #[error("Position {position} occupied by a {occupant} stone")]
    OccupiedPosition { position: Position, occupant: Color },
}

pub type Result<T> = std::result::Result<T, BoardError>;
