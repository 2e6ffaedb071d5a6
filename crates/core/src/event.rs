//! Game events emitted by the live game after a move or at the end of a round.
//!
//! Events are immutable once built. Consumers clone what they need.

use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::scoring::{ComboKind, LaneOutcome, MoveScore, StreakTier};
use crate::types::{Lane, LANES};

/// Result of placing a card into a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    lane: Lane,
    /// The lane as it stood right after the card landed (before any sweep).
    deck: Deck,
    outcome: LaneOutcome,
    streak: u32,
    points: MoveScore,
}

impl ScoreEvent {
    pub fn new(lane: Lane, deck: Deck, outcome: LaneOutcome, streak: u32, points: MoveScore) -> Self {
        Self {
            lane,
            deck,
            outcome,
            streak,
            points,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn outcome(&self) -> LaneOutcome {
        self.outcome
    }

    pub fn twenty_one(&self) -> bool {
        self.outcome.twenty_one
    }

    pub fn five_card(&self) -> bool {
        self.outcome.five_card
    }

    pub fn black_jack(&self) -> bool {
        self.outcome.black_jack
    }

    pub fn bust(&self) -> bool {
        self.outcome.bust
    }

    /// Streak length after this move
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn points(&self) -> MoveScore {
        self.points
    }

    pub fn streak_tier(&self) -> Option<StreakTier> {
        if self.outcome.is_scoring() {
            StreakTier::from_streak(self.streak)
        } else {
            None
        }
    }

    pub fn combo(&self) -> Option<ComboKind> {
        ComboKind::from_outcome(&self.outcome)
    }

    /// 21, bust, five-card or black jack
    pub fn is_lane_outcome(&self) -> bool {
        self.outcome.clears_lane()
    }
}

/// End-of-round summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverEvent {
    pub emptied: [bool; LANES],
    pub busts: u32,
    pub perfect: bool,
    pub time_expired: bool,
}

impl GameOverEvent {
    pub fn emptied_lanes(&self) -> impl Iterator<Item = Lane> + '_ {
        Lane::ALL.into_iter().filter(|l| self.emptied[l.index()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Score(ScoreEvent),
    GameOver(GameOverEvent),
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::Score(_) => "score",
            GameEvent::GameOver(_) => "game_over",
        }
    }

    /// Lane the event belongs to (`None` for game over)
    pub fn lane(&self) -> Option<Lane> {
        match self {
            GameEvent::Score(e) => Some(e.lane()),
            GameEvent::GameOver(_) => None,
        }
    }
}

impl From<ScoreEvent> for GameEvent {
    fn from(e: ScoreEvent) -> Self {
        GameEvent::Score(e)
    }
}

impl From<GameOverEvent> for GameEvent {
    fn from(e: GameOverEvent) -> Self {
        GameEvent::GameOver(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Pile;
    use crate::types::Card;

    fn landed(s: &str) -> Deck {
        Deck::from_cards(Pile::Lane(Lane::new(1)), Card::parse(s).unwrap())
    }

    #[test]
    fn test_streak_tier_only_for_scoring_moves() {
        let scoring = LaneOutcome {
            twenty_one: true,
            ..LaneOutcome::default()
        };
        let e = ScoreEvent::new(Lane::new(1), landed("Kh Ac"), scoring, 3, MoveScore::default());
        assert_eq!(e.streak_tier(), Some(StreakTier::Great));

        let plain = ScoreEvent::new(Lane::new(1), landed("Kh"), LaneOutcome::default(), 3, MoveScore::default());
        assert_eq!(plain.streak_tier(), None);
        assert!(!plain.is_lane_outcome());
    }

    #[test]
    fn test_emptied_lanes() {
        let e = GameOverEvent {
            emptied: [true, false, true, false],
            busts: 1,
            perfect: false,
            time_expired: false,
        };
        let lanes: Vec<Lane> = e.emptied_lanes().collect();
        assert_eq!(lanes, vec![Lane::new(0), Lane::new(2)]);
        assert_eq!(GameEvent::from(e).lane(), None);
    }

    #[test]
    fn test_game_over_json_shape() {
        let e = GameOverEvent {
            emptied: [false; LANES],
            busts: 2,
            perfect: false,
            time_expired: true,
        };
        let json = serde_json::to_value(GameEvent::from(e)).unwrap();
        assert_eq!(json["GameOver"]["busts"], 2);
        assert_eq!(json["GameOver"]["time_expired"], true);
    }
}
