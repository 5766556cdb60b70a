//! Game history with undo/redo.
//!
//! The history is an append-only list of immutable snapshots (one per ply,
//! starting with the empty board) plus a cursor. Undo and redo only move the
//! cursor; registering a move after an undo drops the redo branch.

use tracing::debug;

use crate::board::{Color, Move};
use crate::constants::DEFAULT_BOARD_SIZE;
use crate::error::Result;
use crate::state::GameState;

/// One recorded ply: the resulting snapshot and the move that produced it.
///
/// `mv` is `None` only for the initial empty board.
#[derive(Clone, Debug)]
pub struct Movement {
    pub state: GameState,
    pub mv: Option<Move>,
}

/// A game on a square board, Black to move first.
#[derive(Clone, Debug)]
pub struct Game {
    board_size: usize,
    movements: Vec<Movement>,
    cursor: usize,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl Game {
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            movements: vec![Movement {
                state: GameState::new(board_size, Color::Black),
                mv: None,
            }],
            cursor: 0,
        }
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Index of the current snapshot in [`Self::movements`].
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every recorded snapshot, including any redo branch past the cursor.
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn get_current_game_state(&self) -> &GameState {
        &self.movements[self.cursor].state
    }

    /// Apply `mv` to the current snapshot and make the result current.
    ///
    /// The move is not checked for suicide or ko; validate it first with
    /// [`GameState::is_valid_move`]. Any redo branch is discarded.
    ///
    /// # Errors
    /// Propagates off-board and occupied-point failures from the board.
    pub fn register_move(&mut self, mv: impl Into<Move>) -> Result<&GameState> {
        let mv: Move = mv.into();
        let next = self.get_current_game_state().play_move(mv)?;

        let dropped = self.movements.len() - self.cursor - 1;
        self.movements.truncate(self.cursor + 1);
        self.movements.push(Movement {
            state: next,
            mv: Some(mv),
        });
        self.cursor = self.movements.len() - 1;
        debug!(ply = self.cursor, ?mv, dropped, "registered move");

        Ok(self.get_current_game_state())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.movements.len()
    }

    /// Step the cursor back one ply. Returns whether it moved.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        debug!(ply = self.cursor, "undo");
        true
    }

    /// Step the cursor forward one ply. Returns whether it moved.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        debug!(ply = self.cursor, "redo");
        true
    }

    /// First recorded snapshot whose fingerprint equals `finger_print`.
    ///
    /// Scans the whole history, including snapshots past the cursor.
    pub fn find_movement_by_finger_print(&self, finger_print: &str) -> Option<&GameState> {
        self.movements
            .iter()
            .map(|m| &m.state)
            .find(|state| state.finger_print() == finger_print)
    }

    /// Export the recorded plies as training text.
    ///
    /// One line per ply: `<turn> <fingerprint> <move>`, where turn and
    /// fingerprint (without row breaks) describe the position before the move
    /// and the move is `pass` or the row-major index of the played point.
    pub fn export_to_nn(&self) -> String {
        self.movements
            .windows(2)
            .map(|pair| {
                let before = &pair[0].state;
                let mv = pair[1].mv.unwrap_or(Move::Pass);
                format!(
                    "{} {} {}",
                    before.turn(),
                    before.finger_print().replace('\n', ""),
                    mv.encode(self.board_size)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    fn p(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(5);
        assert_eq!(game.movements().len(), 1);
        assert_eq!(game.cursor(), 0);
        let state = game.get_current_game_state();
        assert_eq!(state.turn(), Color::Black);
        assert_eq!(state.get_empty_positions().len(), 25);
        assert!(game.movements()[0].mv.is_none());
    }

    #[test]
    fn test_register_move() {
        let mut game = Game::new(3);
        let state = game.register_move(p(1, 1)).unwrap();
        assert_eq!(state.finger_print(), "•••\n•●•\n•••\n");
        assert_eq!(state.turn(), Color::White);
        assert_eq!(game.cursor(), 1);
    }

    #[test]
    fn test_register_occupied_fails() {
        let mut game = Game::new(3);
        game.register_move(p(1, 1)).unwrap();
        assert!(game.register_move(p(1, 1)).is_err());
        assert_eq!(game.movements().len(), 2);
    }

    #[test]
    fn test_undo_redo_restore() {
        let mut game = Game::new(5);
        for pos in [p(0, 0), p(1, 1), p(2, 2)] {
            game.register_move(pos).unwrap();
        }
        let fp = game.get_current_game_state().finger_print();
        let turn = game.get_current_game_state().turn();

        for _ in 0..3 {
            assert!(game.undo());
        }
        assert!(!game.undo());
        assert_eq!(game.get_current_game_state().get_empty_positions().len(), 25);

        for _ in 0..3 {
            assert!(game.redo());
        }
        assert!(!game.redo());
        assert_eq!(game.get_current_game_state().finger_print(), fp);
        assert_eq!(game.get_current_game_state().turn(), turn);
    }

    #[test]
    fn test_register_after_undo_drops_redo_branch() {
        let mut game = Game::new(5);
        game.register_move(p(0, 0)).unwrap();
        game.register_move(p(1, 1)).unwrap();
        game.register_move(p(2, 2)).unwrap();
        game.undo();
        game.undo();

        game.register_move(p(4, 4)).unwrap();
        assert_eq!(game.movements().len(), 3);
        assert!(!game.can_redo());
        assert_eq!(
            game.get_current_game_state().get(p(1, 1)).unwrap(),
            None
        );
    }

    #[test]
    fn test_find_by_finger_print_includes_redo_branch() {
        let mut game = Game::new(3);
        game.register_move(p(0, 0)).unwrap();
        let fp = game.get_current_game_state().finger_print();
        game.undo();

        assert!(game.find_movement_by_finger_print(&fp).is_some());
        assert!(game.find_movement_by_finger_print("•••\n•••\n••●\n").is_none());
    }

    #[test]
    fn test_export_to_nn() {
        let mut game = Game::new(3);
        game.register_move(p(0, 0)).unwrap();
        game.register_move(Move::Pass).unwrap();
        game.register_move(p(2, 1)).unwrap();

        let export = game.export_to_nn();
        let lines: Vec<&str> = export.lines().collect();
        assert_eq!(
            lines,
            vec![
                "black ••••••••• 0",
                "white ●•••••••• pass",
                "black ●•••••••• 5",
            ]
        );
    }

    #[test]
    fn test_export_empty_game() {
        assert_eq!(Game::new(3).export_to_nn(), "");
    }
}
