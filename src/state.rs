//! Go board snapshots and move legality.
//!
//! This module provides the core rules of the game:
//! - Stone placement with incremental group merging
//! - Stone removal with group splitting
//! - Liberty counting and capture of dead neighbouring groups
//! - Suicide and ko (positional repetition) detection
//! - Eye detection for playouts
//!
//! A [`GameState`] is treated as a value: [`GameState::play_move`] returns a
//! new snapshot and leaves `self` untouched. The in-place mutators
//! ([`GameState::set`], [`GameState::remove_stone`]) are meant for building
//! positions and for private clones that have not been shared yet.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::trace;

use crate::board::{Cell, Color, GroupId, Move, Position};
use crate::constants::{GLYPH_EMPTY, GLYPH_ROW_END};
use crate::error::{BoardError, Result};
use crate::game::Game;
use crate::groups::GroupSet;

/// A square board together with the side to move.
#[derive(Clone, Debug)]
pub struct GameState {
    size: usize,
    turn: Color,
    /// Row-major stone colours.
    stones: Vec<Option<Color>>,
    /// Connectivity of same-coloured stones; only meaningful on occupied points.
    groups: GroupSet,
}

impl GameState {
    /// An empty `board_size` x `board_size` board.
    pub fn new(board_size: usize, turn: Color) -> Self {
        let points = board_size * board_size;
        Self {
            size: board_size,
            turn,
            stones: vec![None; points],
            groups: GroupSet::new(points),
        }
    }

    pub fn board_size(&self) -> usize {
        self.size
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn is_position_within_boundaries(&self, pos: Position) -> bool {
        pos.is_within(self.size)
    }

    fn checked_index(&self, pos: Position) -> Result<usize> {
        if self.is_position_within_boundaries(pos) {
            Ok(pos.index(self.size))
        } else {
            Err(BoardError::InvalidPosition(pos))
        }
    }

    fn position(&self, index: usize) -> Position {
        Position::from_index(index, self.size)
    }

    fn color_at(&self, pos: Position) -> Option<Color> {
        self.stones[pos.index(self.size)]
    }

    fn group_of(&self, index: usize) -> Option<GroupId> {
        self.stones[index].map(|_| self.groups.find(index))
    }

    /// Colour of the stone at `pos`, if any.
    pub fn get(&self, pos: Position) -> Result<Option<Color>> {
        let i = self.checked_index(pos)?;
        Ok(self.stones[i])
    }

    /// Colour and group of the point at `pos`.
    pub fn get_board_value(&self, pos: Position) -> Result<Cell> {
        let i = self.checked_index(pos)?;
        Ok(Cell {
            colour: self.stones[i],
            group: self.group_of(i),
        })
    }

    /// Group of the stone at `pos`; `None` for empty or off-board points.
    pub fn group_at(&self, pos: Position) -> Option<GroupId> {
        self.checked_index(pos)
            .ok()
            .and_then(|i| self.group_of(i))
    }

    /// Place a stone on an empty point and merge it with adjacent friendly groups.
    ///
    /// # Errors
    /// - [`BoardError::InvalidPosition`] if `pos` is off the board
    /// - [`BoardError::OccupiedPosition`] if `pos` already holds a stone
    pub fn set(&mut self, pos: Position, colour: Color) -> Result<()> {
        let i = self.checked_index(pos)?;
        if let Some(occupant) = self.stones[i] {
            return Err(BoardError::OccupiedPosition {
                position: pos,
                occupant,
            });
        }

        self.stones[i] = Some(colour);
        self.groups.reset(i);
        for n in pos.neighbors(self.size) {
            let ni = n.index(self.size);
            if self.stones[ni] == Some(colour) {
                self.groups.union(i, ni);
            }
        }
        Ok(())
    }

    /// Board indices of every stone in `group`, ascending.
    fn members(&self, group: GroupId) -> Vec<usize> {
        (0..self.stones.len())
            .filter(|&i| self.group_of(i) == Some(group))
            .collect()
    }

    /// Clear the stone at `pos`, splitting its former group if it disconnects.
    ///
    /// Removing from an empty point is a no-op.
    pub fn remove_stone(&mut self, pos: Position) -> Result<()> {
        let i = self.checked_index(pos)?;
        let Some(group) = self.group_of(i) else {
            return Ok(());
        };

        let members = self.members(group);
        for &m in &members {
            self.groups.reset(m);
        }
        self.stones[i] = None;

        // Raster rescan: joining each stone to its left and upper friends
        // rebuilds every remaining connected piece.
        for &m in &members {
            let Some(colour) = self.stones[m] else {
                continue;
            };
            let p = self.position(m);
            if p.x > 0 && self.stones[m - 1] == Some(colour) {
                self.groups.union(m, m - 1);
            }
            if p.y > 0 && self.stones[m - self.size] == Some(colour) {
                self.groups.union(m, m - self.size);
            }
        }
        Ok(())
    }

    fn remove_group(&mut self, group: GroupId) -> usize {
        let members = self.members(group);
        for &m in &members {
            self.stones[m] = None;
            self.groups.reset(m);
        }
        members.len()
    }

    /// Distinct empty points adjacent to any stone of `group`.
    pub fn calculate_liberties(&self, group: GroupId) -> BTreeSet<Position> {
        let mut liberties = BTreeSet::new();
        for m in self.members(group) {
            for n in self.position(m).neighbors(self.size) {
                if self.color_at(n).is_none() {
                    liberties.insert(n);
                }
            }
        }
        liberties
    }

    /// Liberty count of every group on the board, keyed by group id.
    pub fn liberty_counts(&self) -> BTreeMap<GroupId, usize> {
        let mut counts = BTreeMap::new();
        for i in 0..self.stones.len() {
            if let Some(group) = self.group_of(i) {
                counts.entry(group).or_insert(0);
            }
        }
        for pos in self.get_empty_positions() {
            let mut adjacent: Vec<GroupId> = Vec::with_capacity(4);
            for n in pos.neighbors(self.size) {
                if let Some(group) = self.group_of(n.index(self.size)) {
                    if !adjacent.contains(&group) {
                        adjacent.push(group);
                    }
                }
            }
            for group in adjacent {
                *counts.entry(group).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Capture opposing groups adjacent to `pos` that have no liberties left.
    ///
    /// Only the neighbours of `pos` are inspected. Returns the number of
    /// stones removed.
    pub fn remove_dead_groups_around(&mut self, pos: Position) -> Result<usize> {
        let i = self.checked_index(pos)?;
        let Some(colour) = self.stones[i] else {
            return Ok(0);
        };
        let opponent = colour.opponent();

        let mut inspected: Vec<GroupId> = Vec::with_capacity(4);
        let mut captured = 0;
        for n in pos.neighbors(self.size) {
            let ni = n.index(self.size);
            if self.stones[ni] != Some(opponent) {
                continue;
            }
            let group = self.groups.find(ni);
            if inspected.contains(&group) {
                continue;
            }
            inspected.push(group);
            if self.calculate_liberties(group).is_empty() {
                captured += self.remove_group(group);
            }
        }

        if captured > 0 {
            trace!(%pos, captured, "captured stones");
        }
        Ok(captured)
    }

    /// The snapshot after the side to move passes.
    pub fn pass(&self) -> GameState {
        let mut next = self.clone();
        next.turn = self.turn.opponent();
        next
    }

    /// The snapshot after `mv` is played by the side to move.
    ///
    /// Places the stone, captures dead neighbouring groups, and flips the
    /// turn. Suicide and ko are not checked here; see [`Self::is_valid_move`].
    ///
    /// # Errors
    /// Propagates [`Self::set`] failures for off-board or occupied points.
    pub fn play_move(&self, mv: impl Into<Move>) -> Result<GameState> {
        let mv: Move = mv.into();
        let pos = match mv {
            Move::Pass => return Ok(self.pass()),
            Move::Play(pos) => pos,
        };
        let mut next = self.clone();
        next.set(pos, self.turn)?;
        next.remove_dead_groups_around(pos)?;
        next.turn = self.turn.opponent();
        Ok(next)
    }

    /// The successor snapshot if `mv` is legal, otherwise `None`.
    ///
    /// Ko is only checked when a `game` is supplied: the successor must not
    /// reproduce any position recorded in its history.
    pub fn try_move(&self, mv: impl Into<Move>, game: Option<&Game>) -> Option<GameState> {
        let mv: Move = mv.into();
        let pos = match mv {
            Move::Pass => return Some(self.pass()),
            Move::Play(pos) => pos,
        };
        let next = self.play_move(pos).ok()?;

        // Suicide
        let group = next.group_at(pos)?;
        if next.calculate_liberties(group).is_empty() {
            return None;
        }

        // Ko
        if let Some(game) = game {
            if game
                .find_movement_by_finger_print(&next.finger_print())
                .is_some()
            {
                return None;
            }
        }
        Some(next)
    }

    /// Whether `mv` is legal for the side to move. Passing is always legal.
    pub fn is_valid_move(&self, mv: impl Into<Move>, game: Option<&Game>) -> bool {
        self.try_move(mv, game).is_some()
    }

    /// Check if an empty point is an eye of the side to move.
    ///
    /// All orthogonal neighbours must be friendly stones. Among the diagonal
    /// neighbours, one opposing stone is tolerated in the centre and none on
    /// the edge or in a corner.
    pub fn is_eye(&self, pos: Position) -> bool {
        if !self.is_position_within_boundaries(pos) || self.color_at(pos).is_some() {
            return false;
        }

        let own = Some(self.turn);
        if pos.neighbors(self.size).any(|n| self.color_at(n) != own) {
            return false;
        }

        let opponent = Some(self.turn.opponent());
        let false_count = pos
            .diagonal_neighbors(self.size)
            .filter(|&d| self.color_at(d) == opponent)
            .count();
        let tolerance = if pos.is_on_edge(self.size) { 0 } else { 1 };
        false_count <= tolerance
    }

    /// Colour layout as text: one glyph per point, a newline after each row.
    ///
    /// Group ids are not part of the fingerprint, so equal fingerprints mean
    /// positionally identical boards.
    pub fn finger_print(&self) -> String {
        let mut out = String::with_capacity(self.stones.len() * 3 + self.size);
        for row in self.stones.chunks(self.size.max(1)) {
            for stone in row {
                out.push(stone.map_or(GLYPH_EMPTY, Color::glyph));
            }
            out.push(GLYPH_ROW_END);
        }
        out
    }

    fn count(&self, colour: Color) -> usize {
        self.stones.iter().filter(|&&s| s == Some(colour)).count()
    }

    pub fn number_of_black_stones(&self) -> usize {
        self.count(Color::Black)
    }

    pub fn number_of_white_stones(&self) -> usize {
        self.count(Color::White)
    }

    /// Every occupied point with its cell, in row-major order.
    pub fn get_all_elements(&self) -> Vec<(Position, Cell)> {
        (0..self.stones.len())
            .filter(|&i| self.stones[i].is_some())
            .map(|i| {
                let cell = Cell {
                    colour: self.stones[i],
                    group: self.group_of(i),
                };
                (self.position(i), cell)
            })
            .collect()
    }

    /// Every empty point, in row-major order.
    pub fn get_empty_positions(&self) -> Vec<Position> {
        (0..self.stones.len())
            .filter(|&i| self.stones[i].is_none())
            .map(|i| self.position(i))
            .collect()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.finger_print())
    }
}
