//! Line-oriented text controller.
//!
//! Speaks a GTP-like protocol: each command gets a `=` (success) or `?`
//! (failure) response, optionally tagged with the numeric id that prefixed
//! the command. Coordinates are 0-based `x y` pairs.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command <cmd>`
//! - `quit` - Exit the loop
//! - `boardsize <size>` - Start a new game on a `size` x `size` board
//! - `clear_board` - Start a new game on the current board size
//! - `play <x> <y>` / `play pass` - Play for the side to move (ko is enforced)
//! - `undo` / `redo` - Move through the game history
//! - `showboard` - Print the board and the side to move
//! - `liberties <x> <y>` - Liberty count of the group at a point
//! - `score` - Black's winning chance by stone count
//! - `winning_chance` - Chance that Black covers most of the board
//! - `export` - Dump the game as training text

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use crate::board::{Move, Position};
use crate::constants::MAX_BOARD_SIZE;
use crate::game::Game;
use crate::playout::Scorer;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "export",
    "known_command",
    "liberties",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "redo",
    "score",
    "showboard",
    "undo",
    "version",
    "winning_chance",
];

/// Parse and validate a board size argument.
pub fn parse_board_size(s: &str) -> std::result::Result<usize, String> {
    let size: usize = s
        .parse()
        .map_err(|_| format!("invalid board size: {s}"))?;
    if !(1..=MAX_BOARD_SIZE).contains(&size) {
        return Err(format!(
            "unacceptable size {size}, expected 1 to {MAX_BOARD_SIZE}"
        ));
    }
    Ok(size)
}

/// Parse `pass` or an `x y` coordinate pair.
pub fn parse_move(args: &[&str]) -> Result<Move> {
    match args {
        [word] if word.eq_ignore_ascii_case("pass") => Ok(Move::Pass),
        [x, y] => Ok(Move::Play(parse_position(x, y)?)),
        _ => bail!("expected <x> <y> or pass"),
    }
}

fn parse_position(x: &str, y: &str) -> Result<Position> {
    let x: usize = x.parse().with_context(|| format!("invalid x coordinate: {x}"))?;
    let y: usize = y.parse().with_context(|| format!("invalid y coordinate: {y}"))?;
    Ok(Position::new(x, y))
}

/// Console state: the game being played and the scorer used for estimates.
pub struct Console {
    game: Game,
    scorer: Scorer,
}

impl Console {
    pub fn new(board_size: usize) -> Self {
        Self::with_scorer(board_size, Scorer::new())
    }

    pub fn with_scorer(board_size: usize, scorer: Scorer) -> Self {
        Self {
            game: Game::new(board_size),
            scorer,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(err) => ('?', err.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute one command and return its response text.
    fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        debug!(command, ?args, "console command");
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().ok_or_else(|| anyhow!("missing argument"))?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let arg = args.first().ok_or_else(|| anyhow!("missing argument"))?;
                let size = parse_board_size(arg).map_err(|e| anyhow!(e))?;
                self.game = Game::new(size);
                Ok(String::new())
            }

            "clear_board" => {
                self.game = Game::new(self.game.board_size());
                Ok(String::new())
            }

            "play" => {
                let mv = parse_move(args)?;
                let state = self.game.get_current_game_state();
                if !state.is_valid_move(mv, Some(&self.game)) {
                    bail!("illegal move");
                }
                self.game.register_move(mv)?;
                Ok(String::new())
            }

            "undo" => {
                if !self.game.undo() {
                    bail!("cannot undo");
                }
                Ok(String::new())
            }

            "redo" => {
                if !self.game.redo() {
                    bail!("cannot redo");
                }
                Ok(String::new())
            }

            "showboard" => {
                let state = self.game.get_current_game_state();
                Ok(format!("\n{}{} to move", state, state.turn()))
            }

            "liberties" => {
                let [x, y] = args else {
                    bail!("expected <x> <y>");
                };
                let pos = parse_position(x, y)?;
                let state = self.game.get_current_game_state();
                let group = state
                    .group_at(pos)
                    .ok_or_else(|| anyhow!("no stone at {pos}"))?;
                Ok(state.calculate_liberties(group).len().to_string())
            }

            "score" => {
                let state = self.game.get_current_game_state();
                Ok(self.scorer.score(state).to_string())
            }

            "winning_chance" => {
                let state = self.game.get_current_game_state();
                Ok(format!("{}%", self.scorer.winning_chance(state)))
            }

            "export" => Ok(self.game.export_to_nn()),

            _ => bail!("unknown command: {command}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> Console {
        Console::with_scorer(5, Scorer::with_seed(1).playouts(20))
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = Console::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = Console::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_known_command() {
        let mut c = console();
        assert_eq!(c.execute("known_command", &["play"]).unwrap(), "true");
        assert_eq!(c.execute("known_command", &["genmove"]).unwrap(), "false");
        assert!(c.execute("known_command", &[]).is_err());
    }

    #[test]
    fn test_boardsize() {
        let mut c = console();
        assert!(c.execute("boardsize", &["9"]).is_ok());
        assert_eq!(c.game().board_size(), 9);
        assert!(c.execute("boardsize", &["0"]).is_err());
        assert!(c.execute("boardsize", &["abc"]).is_err());
    }

    #[test]
    fn test_play_undo_redo() {
        let mut c = console();
        c.execute("play", &["2", "2"]).unwrap();
        assert!(c.execute("play", &["2", "2"]).is_err());
        c.execute("play", &["pass"]).unwrap();
        assert_eq!(c.game().cursor(), 2);

        c.execute("undo", &[]).unwrap();
        c.execute("undo", &[]).unwrap();
        assert!(c.execute("undo", &[]).is_err());
        c.execute("redo", &[]).unwrap();
        assert_eq!(c.game().cursor(), 1);
    }

    #[test]
    fn test_play_rejects_bad_arguments() {
        let mut c = console();
        assert!(c.execute("play", &["1"]).is_err());
        assert!(c.execute("play", &["a", "1"]).is_err());
        assert!(c.execute("play", &["7", "1"]).is_err());
    }

    #[test]
    fn test_liberties() {
        let mut c = console();
        c.execute("play", &["0", "0"]).unwrap();
        assert_eq!(c.execute("liberties", &["0", "0"]).unwrap(), "2");
        assert!(c.execute("liberties", &["3", "3"]).is_err());
    }

    #[test]
    fn test_score_response() {
        let mut c = console();
        let response = c.execute("score", &[]).unwrap();
        assert!(response.ends_with('%'));
    }

    #[test]
    fn test_run_loop() {
        let mut c = console();
        let input = "1 play 0 0\n# comment\n2 play 0 0\nshowboard\nquit\nname\n";
        let mut output = Vec::new();
        c.run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("=1 \n\n?2 illegal move\n\n"));
        assert!(text.contains("●••••\n"));
        assert!(text.contains("white to move"));
        assert!(!text.contains("goban-rust"));
    }
}
