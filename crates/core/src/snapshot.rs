//! Deep copies of the table used by undo.
//!
//! A snapshot owns every pile and counter outright, so later moves on the
//! live game never reach into it.

use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::game_state::Game;
use crate::score::Score;
use crate::types::{Lane, LANES};

/// Scalar counters restored together with the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    /// Consecutive scoring moves.
    pub streak: u32,
    /// Cards not yet placed (draw pile plus active slot).
    pub remaining: u32,
    /// Lanes busted so far this round.
    pub busted: u32,
    pub last_lane: Option<Lane>,
}

/// Deep, independently owned copy of every pile and counter of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    score: Score,
    draw: Deck,
    active: Deck,
    lanes: [Deck; LANES],
    counters: Counters,
}

impl StateSnapshot {
    /// Clone the live game's piles and counters
    pub fn capture(game: &Game) -> Self {
        Self {
            score: *game.score(),
            draw: game.draw().clone(),
            active: game.active().clone(),
            lanes: Lane::ALL.map(|l| game.lane(l).clone()),
            counters: game.counters(),
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn draw(&self) -> &Deck {
        &self.draw
    }

    pub fn active(&self) -> &Deck {
        &self.active
    }

    pub fn lane(&self, lane: Lane) -> &Deck {
        &self.lanes[lane.index()]
    }

    pub fn lanes(&self) -> &[Deck; LANES] {
        &self.lanes
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn streak(&self) -> u32 {
        self.counters.streak
    }

    pub fn remaining(&self) -> u32 {
        self.counters.remaining
    }

    pub fn busted(&self) -> u32 {
        self.counters.busted
    }

    pub fn last_lane(&self) -> Option<Lane> {
        self.counters.last_lane
    }

    /// Structural equality of every pile, plus counters and score
    pub fn same_table(&self, other: &StateSnapshot) -> bool {
        self.score == other.score
            && self.counters == other.counters
            && self.draw.deck_equals(&other.draw)
            && self.active.deck_equals(&other.active)
            && self
                .lanes
                .iter()
                .zip(other.lanes.iter())
                .all(|(a, b)| a.deck_equals(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_independent_of_live_game() {
        let mut game = Game::new(9);
        game.start();
        let snap = StateSnapshot::capture(&game);

        game.play(Lane::new(2)).unwrap();

        assert!(snap.lane(Lane::new(2)).is_empty());
        assert_eq!(snap.remaining(), 52);
        assert_eq!(snap.active().len(), 1);
        assert!(!snap.same_table(&StateSnapshot::capture(&game)));
    }

    #[test]
    fn test_capture_round_trips_counters() {
        let mut game = Game::new(9);
        game.start();
        game.play(Lane::new(0)).unwrap();
        let snap = StateSnapshot::capture(&game);
        assert_eq!(snap.counters(), game.counters());
        assert_eq!(snap.last_lane(), Some(Lane::new(0)));
        assert!(snap.same_table(&snap.clone()));
    }
}
