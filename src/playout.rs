//! Monte Carlo playouts (random game simulation) and score estimation.
//!
//! A playout plays uniformly random legal moves, never filling an eye of the
//! side to move, until two consecutive passes or the ply cap. The final
//! position is scored by counting stones on the board.
//!
//! Playouts are independent of one another, so a [`Scorer`] can fan them out
//! across worker threads and simply sum the results.

use std::fmt;
use std::thread;

use fastrand::Rng;
use tracing::{info, trace};

use crate::constants::{MAX_PLAYOUT_PLIES, N_PLAYOUTS, PASSES_TO_END};
use crate::state::GameState;

/// Stone counts at the end of one playout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub black: usize,
    pub white: usize,
}

impl Outcome {
    fn of(state: &GameState) -> Self {
        Self {
            black: state.number_of_black_stones(),
            white: state.number_of_white_stones(),
        }
    }
}

/// Black's estimated winning chance, as a percentage with two decimals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreReport {
    pub black_winning_chances: String,
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.black_winning_chances)
    }
}

/// Perform a Monte Carlo playout from the given state.
///
/// The input is left untouched; the final state of the playout is returned.
/// Ko is not checked during playouts.
pub fn simulate(state: &GameState, rng: &mut Rng) -> GameState {
    simulate_with_cap(state, rng, MAX_PLAYOUT_PLIES)
}

/// [`simulate`] with an explicit cap on plies (moves and passes).
pub fn simulate_with_cap(state: &GameState, rng: &mut Rng, max_plies: usize) -> GameState {
    let mut state = state.clone();
    let mut candidates = state.get_empty_positions();
    let mut passes = 0;
    let mut plies = 0;

    while passes < PASSES_TO_END && plies < max_plies {
        if candidates.is_empty() {
            state = state.pass();
            passes += 1;
            plies += 1;
            candidates = state.get_empty_positions();
            continue;
        }

        let i = rng.usize(..candidates.len());
        let pos = candidates[i];
        if state.is_eye(pos) {
            candidates.swap_remove(i);
            continue;
        }
        match state.try_move(pos, None) {
            Some(next) => {
                state = next;
                passes = 0;
                plies += 1;
                candidates = state.get_empty_positions();
            }
            None => {
                candidates.swap_remove(i);
            }
        }
    }

    trace!(
        plies,
        black = state.number_of_black_stones(),
        white = state.number_of_white_stones(),
        "playout finished"
    );
    state
}

fn percentage(wins: usize, total: usize) -> String {
    if total == 0 {
        return format!("{:.2}", 0.0);
    }
    format!("{:.2}", 100.0 * wins as f64 / total as f64)
}

/// Runs batches of playouts and aggregates them into win estimates.
///
/// The random source is injectable: [`Scorer::new`] seeds from the
/// environment, [`Scorer::with_seed`] gives reproducible results for a fixed
/// thread count.
pub struct Scorer {
    rng: Rng,
    playouts: usize,
    max_plies: usize,
    threads: usize,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer {
    pub fn new() -> Self {
        Self::with_rng(Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Rng::with_seed(seed))
    }

    pub fn with_rng(rng: Rng) -> Self {
        Self {
            rng,
            playouts: N_PLAYOUTS,
            max_plies: MAX_PLAYOUT_PLIES,
            threads: 1,
        }
    }

    /// Number of playouts per estimate.
    pub fn playouts(mut self, playouts: usize) -> Self {
        self.playouts = playouts;
        self
    }

    /// Ply cap for each playout.
    pub fn max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Worker threads to spread playouts over (at least one).
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Run every playout from `state` and collect the final stone counts.
    pub fn run_playouts(&mut self, state: &GameState) -> Vec<Outcome> {
        let max_plies = self.max_plies;
        let workers = self.threads.min(self.playouts).max(1);
        if workers == 1 {
            let rng = &mut self.rng;
            return (0..self.playouts)
                .map(|_| Outcome::of(&simulate_with_cap(state, rng, max_plies)))
                .collect();
        }

        let seeds: Vec<u64> = (0..workers).map(|_| self.rng.u64(..)).collect();
        let base = self.playouts / workers;
        let extra = self.playouts % workers;

        thread::scope(|s| {
            let handles: Vec<_> = seeds
                .into_iter()
                .enumerate()
                .map(|(w, seed)| {
                    let count = base + usize::from(w < extra);
                    s.spawn(move || {
                        let mut rng = Rng::with_seed(seed);
                        (0..count)
                            .map(|_| Outcome::of(&simulate_with_cap(state, &mut rng, max_plies)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Percentage of playouts in which Black ends with more stones than White.
    pub fn score(&mut self, state: &GameState) -> ScoreReport {
        let outcomes = self.run_playouts(state);
        let black_wins = outcomes.iter().filter(|o| o.black > o.white).count();
        let report = ScoreReport {
            black_winning_chances: percentage(black_wins, outcomes.len()),
        };
        info!(
            playouts = outcomes.len(),
            black_wins,
            chance = %report,
            "score estimate"
        );
        report
    }

    /// Percentage of playouts in which Black covers more than half the board.
    pub fn winning_chance(&mut self, state: &GameState) -> String {
        let points = state.board_size() * state.board_size();
        let outcomes = self.run_playouts(state);
        let black_wins = outcomes.iter().filter(|o| o.black * 2 > points).count();
        let chance = percentage(black_wins, outcomes.len());
        info!(playouts = outcomes.len(), black_wins, %chance, "winning chance");
        chance
    }
}

/// Estimate Black's winning chance from `state` with a default [`Scorer`].
pub fn score(state: &GameState) -> ScoreReport {
    Scorer::new().score(state)
}

/// Estimate the chance that Black covers most of the board from `state`.
pub fn winning_chance(state: &GameState) -> String {
    Scorer::new().winning_chance(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Position};

    fn has_two_decimals(s: &str) -> bool {
        matches!(s.split_once('.'), Some((_, frac)) if frac.len() == 2)
    }

    #[test]
    fn test_simulate_leaves_input_untouched() {
        let state = GameState::new(5, Color::Black);
        let mut rng = Rng::with_seed(1);
        let end = simulate(&state, &mut rng);
        assert_eq!(state.get_empty_positions().len(), 25);
        assert!(end.number_of_black_stones() + end.number_of_white_stones() > 0);
    }

    #[test]
    fn test_simulate_is_reproducible_with_seed() {
        let state = GameState::new(5, Color::Black);
        let a = simulate(&state, &mut Rng::with_seed(42));
        let b = simulate(&state, &mut Rng::with_seed(42));
        assert_eq!(a.finger_print(), b.finger_print());
        assert_eq!(a.turn(), b.turn());
    }

    #[test]
    fn test_simulate_respects_ply_cap() {
        let state = GameState::new(5, Color::Black);
        let end = simulate_with_cap(&state, &mut Rng::with_seed(3), 0);
        assert_eq!(end.finger_print(), state.finger_print());

        let end = simulate_with_cap(&state, &mut Rng::with_seed(3), 4);
        assert!(end.number_of_black_stones() + end.number_of_white_stones() <= 4);
    }

    #[test]
    fn test_simulate_does_not_fill_own_eyes() {
        // ●●●
        // ●e●   (1,1) is filled, eyes at (0,0) and (2,2)
        // ●●e
        let mut state = GameState::new(3, Color::Black);
        for (x, y) in [(1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (0, 2), (1, 2)] {
            state.set(Position::new(x, y), Color::Black).unwrap();
        }
        let end = simulate(&state, &mut Rng::with_seed(9));
        assert_eq!(end.finger_print(), state.finger_print());
        assert_eq!(end.number_of_black_stones(), 7);
    }

    #[test]
    fn test_score_format_and_range() {
        let state = GameState::new(5, Color::Black);
        let report = Scorer::with_seed(5).playouts(50).score(&state);
        let value: f64 = report.black_winning_chances.parse().unwrap();
        assert!((0.0..=100.0).contains(&value));
        assert!(has_two_decimals(&report.black_winning_chances));
        assert!(report.to_string().ends_with('%'));
    }

    #[test]
    fn test_score_single_point_board() {
        // The only point is an eye for whoever moves, so every playout ends empty.
        let state = GameState::new(1, Color::Black);
        let report = Scorer::with_seed(1).playouts(10).score(&state);
        assert_eq!(report.black_winning_chances, "0.00");
    }

    #[test]
    fn test_score_without_playouts() {
        let state = GameState::new(3, Color::Black);
        let mut scorer = Scorer::with_seed(1).playouts(0);
        assert_eq!(scorer.score(&state).black_winning_chances, "0.00");
        assert_eq!(scorer.winning_chance(&state), "0.00");
    }

    #[test]
    fn test_seeded_scorer_is_deterministic() {
        let state = GameState::new(5, Color::Black);
        let a = Scorer::with_seed(11).playouts(40).score(&state);
        let b = Scorer::with_seed(11).playouts(40).score(&state);
        assert_eq!(a, b);
    }

    #[test]
    fn test_threaded_playouts() {
        let state = GameState::new(5, Color::Black);
        let a = Scorer::with_seed(13).playouts(41).threads(4).run_playouts(&state);
        let b = Scorer::with_seed(13).playouts(41).threads(4).run_playouts(&state);
        assert_eq!(a.len(), 41);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_board_is_roughly_even() {
        let state = GameState::new(7, Color::Black);
        let report = Scorer::with_seed(2024).playouts(400).score(&state);
        let value: f64 = report.black_winning_chances.parse().unwrap();
        assert!(
            (25.0..=75.0).contains(&value),
            "empty board estimate out of range: {value}"
        );
    }

    #[test]
    fn test_winning_chance_range() {
        let state = GameState::new(5, Color::Black);
        let chance = Scorer::with_seed(8).playouts(30).winning_chance(&state);
        let value: f64 = chance.parse().unwrap();
        assert!((0.0..=100.0).contains(&value));
        assert!(has_two_decimals(&chance));
    }
}
