//! Constants for board geometry, playout parameters, and text encodings.
//!
//! Board size is a runtime value (every [`Game`](crate::game::Game) is
//! created with its own size), so only defaults live here.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when none is given. Standard Go sizes are 9, 13, or 19.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Largest board the console and CLI accept.
pub const MAX_BOARD_SIZE: usize = 25;

// =============================================================================
// Playout Parameters
// =============================================================================

/// Number of independent playouts aggregated by a score estimate.
pub const N_PLAYOUTS: usize = 1000;

/// Hard cap on plies (moves and passes) in a single playout.
pub const MAX_PLAYOUT_PLIES: usize = 500;

/// Consecutive passes that end a playout.
pub const PASSES_TO_END: u32 = 2;

// =============================================================================
// Fingerprint Glyphs
// =============================================================================

/// Black stone.
pub const GLYPH_BLACK: char = '●';

/// White stone.
pub const GLYPH_WHITE: char = '○';

/// Empty point.
pub const GLYPH_EMPTY: char = '•';

/// Row terminator.
pub const GLYPH_ROW_END: char = '\n';

/// Move encoding for a pass in exported games.
pub const PASS_ENCODING: &str = "pass";
