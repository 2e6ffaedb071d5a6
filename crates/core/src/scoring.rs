//! Scoring module - lane evaluation and point tables
//!
//! Rules:
//! - Lane totals count 2-10 at face value, faces as 10, and one ace as 11
//!   whenever that keeps the total at or below 21.
//! - A black jack (J♣/J♠) is wild: it clears the lane and never busts.
//! - A lane totalling 21 scores; a lane of five cards without busting scores.
//! - A hard total above 21 busts the lane.
//! - Streak bonus is `STREAK_BASE_POINTS * tier` for streaks 2..=6, nothing beyond.
//! - Combo bonus comes from a fixed table keyed by which outcomes coincided.

use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::types::{
    Card, Rank, BLACK_JACK_POINTS, FIVE_CARD_COUNT, FIVE_CARD_POINTS, STREAK_BASE_POINTS,
    TARGET_TOTAL, TWENTY_ONE_POINTS,
};

/// Hard and best (soft-ace) totals of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaneTotal {
    pub hard: u8,
    pub best: u8,
}

impl LaneTotal {
    pub fn is_soft(&self) -> bool {
        self.best != self.hard
    }
}

/// Total the cards of a lane
pub fn lane_total(cards: &[Card]) -> LaneTotal {
    let hard = cards
        .iter()
        .fold(0u8, |acc, c| acc.saturating_add(c.rank().value()));
    let has_ace = cards.iter().any(|c| c.rank() == Rank::Ace);
    let best = if has_ace && hard.saturating_add(10) <= TARGET_TOTAL {
        hard + 10
    } else {
        hard
    };
    LaneTotal { hard, best }
}

/// What playing a card into a lane achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneOutcome {
    pub twenty_one: bool,
    pub five_card: bool,
    pub black_jack: bool,
    pub bust: bool,
}

impl LaneOutcome {
    /// 21, five-card or black jack
    pub fn is_scoring(&self) -> bool {
        self.twenty_one || self.five_card || self.black_jack
    }

    /// Whether the lane is swept off the table
    pub fn clears_lane(&self) -> bool {
        self.is_scoring() || self.bust
    }
}

/// Evaluate `lane` right after `played` was put on top of it
pub fn evaluate_lane(lane: &Deck, played: &Card) -> LaneOutcome {
    let total = lane_total(lane.cards());
    let black_jack = played.is_black_jack();
    let bust = !black_jack && total.hard > TARGET_TOTAL;

    LaneOutcome {
        twenty_one: !bust && total.best == TARGET_TOTAL,
        five_card: !bust && lane.len() >= FIVE_CARD_COUNT,
        black_jack,
        bust,
    }
}

/// Base points for an outcome (streak and combo bonuses excluded)
pub fn outcome_points(outcome: &LaneOutcome) -> u32 {
    let mut points = 0;
    if outcome.twenty_one {
        points += TWENTY_ONE_POINTS;
    }
    if outcome.five_card {
        points += FIVE_CARD_POINTS;
    }
    if outcome.black_jack {
        points += BLACK_JACK_POINTS;
    }
    points
}

/// Streak escalation tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreakTier {
    Good,
    Great,
    Amazing,
    Outstanding,
    Perfect,
}

impl StreakTier {
    /// Tier for a streak length
    ///
    /// The table covers streaks 2..=6. Longer streaks fall off the table and
    /// get no tier.
    pub fn from_streak(streak: u32) -> Option<Self> {
        match streak {
            2 => Some(StreakTier::Good),
            3 => Some(StreakTier::Great),
            4 => Some(StreakTier::Amazing),
            5 => Some(StreakTier::Outstanding),
            6 => Some(StreakTier::Perfect),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> u32 {
        match self {
            StreakTier::Good => 1,
            StreakTier::Great => 2,
            StreakTier::Amazing => 3,
            StreakTier::Outstanding => 4,
            StreakTier::Perfect => 5,
        }
    }

    pub fn bonus(&self) -> u32 {
        STREAK_BASE_POINTS * self.multiplier()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreakTier::Good => "good",
            StreakTier::Great => "great",
            StreakTier::Amazing => "amazing",
            StreakTier::Outstanding => "outstanding",
            StreakTier::Perfect => "perfect",
        }
    }
}

/// Streak bonus points for a streak length
pub fn streak_bonus(streak: u32) -> u32 {
    StreakTier::from_streak(streak).map_or(0, |t| t.bonus())
}

/// Multi-condition outcomes that pay a combo bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboKind {
    TwentyOneFiveCardBlackJack,
    TwentyOneFiveCard,
    FiveCardBlackJack,
    TwentyOneBlackJack,
}

impl ComboKind {
    pub fn from_outcome(outcome: &LaneOutcome) -> Option<Self> {
        match (outcome.twenty_one, outcome.five_card, outcome.black_jack) {
            (true, true, true) => Some(ComboKind::TwentyOneFiveCardBlackJack),
            (true, true, false) => Some(ComboKind::TwentyOneFiveCard),
            (false, true, true) => Some(ComboKind::FiveCardBlackJack),
            (true, false, true) => Some(ComboKind::TwentyOneBlackJack),
            _ => None,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            ComboKind::TwentyOneFiveCardBlackJack => 1500,
            ComboKind::TwentyOneFiveCard => 1000,
            ComboKind::FiveCardBlackJack => 800,
            ComboKind::TwentyOneBlackJack => 500,
        }
    }
}

/// Combo bonus points for an outcome
pub fn combo_bonus(outcome: &LaneOutcome) -> u32 {
    ComboKind::from_outcome(outcome).map_or(0, |c| c.points())
}

/// Points breakdown for one move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveScore {
    pub base: u32,
    pub streak_bonus: u32,
    pub combo_bonus: u32,
    pub total: u32,
}

/// Score a move given its outcome and the streak length after it
pub fn calculate_move_score(outcome: &LaneOutcome, streak: u32) -> MoveScore {
    if !outcome.is_scoring() {
        return MoveScore::default();
    }
    let base = outcome_points(outcome);
    let streak_bonus = streak_bonus(streak);
    let combo_bonus = combo_bonus(outcome);
    MoveScore {
        base,
        streak_bonus,
        combo_bonus,
        total: base + streak_bonus + combo_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Pile;
    use crate::types::Lane;

    fn lane(s: &str) -> Deck {
        Deck::from_cards(Pile::Lane(Lane::new(0)), Card::parse(s).unwrap())
    }

    fn eval(s: &str) -> LaneOutcome {
        let d = lane(s);
        let played = *d.top_card().unwrap();
        evaluate_lane(&d, &played)
    }

    #[test]
    fn test_lane_totals() {
        assert_eq!(lane_total(&Card::parse("Kh 7c").unwrap()).best, 17);
        assert_eq!(lane_total(&Card::parse("Ah 7c").unwrap()).best, 18);
        assert_eq!(lane_total(&Card::parse("Ah 7c").unwrap()).hard, 8);
        assert_eq!(lane_total(&Card::parse("Ah Ac 9d").unwrap()).best, 21);
        assert_eq!(lane_total(&Card::parse("Ah Kc 5d").unwrap()).best, 16);
        assert!(!lane_total(&Card::parse("Ah Kc 5d").unwrap()).is_soft());
    }

    #[test]
    fn test_twenty_one() {
        let o = eval("Kh 5c 6d");
        assert!(o.twenty_one && !o.bust && !o.five_card && !o.black_jack);
        assert!(o.clears_lane());
    }

    #[test]
    fn test_natural_black_jack_is_combo() {
        let o = eval("Ah Js");
        assert!(o.twenty_one && o.black_jack);
        assert_eq!(ComboKind::from_outcome(&o), Some(ComboKind::TwentyOneBlackJack));
    }

    #[test]
    fn test_black_jack_never_busts() {
        let o = eval("Kh 9c Jc");
        assert!(o.black_jack);
        assert!(!o.bust);
        assert!(!o.twenty_one);
    }

    #[test]
    fn test_red_jack_busts() {
        let o = eval("Kh 9c Jh");
        assert!(o.bust);
        assert!(!o.is_scoring());
        assert!(o.clears_lane());
    }

    #[test]
    fn test_five_card() {
        let o = eval("2c 3d 2h 4s 5c");
        assert!(o.five_card && !o.twenty_one);
        let o = eval("2c 3d 2h 4s Kc");
        assert!(o.five_card && o.twenty_one);
        assert_eq!(calculate_move_score(&o, 1).combo_bonus, 1000);
    }

    #[test]
    fn test_no_outcome() {
        let o = eval("9c 4d");
        assert_eq!(o, LaneOutcome::default());
        assert!(!o.clears_lane());
        assert_eq!(calculate_move_score(&o, 0), MoveScore::default());
    }

    #[test]
    fn test_streak_table() {
        assert_eq!(StreakTier::from_streak(0), None);
        assert_eq!(StreakTier::from_streak(1), None);
        assert_eq!(StreakTier::from_streak(2), Some(StreakTier::Good));
        assert_eq!(StreakTier::from_streak(3), Some(StreakTier::Great));
        assert_eq!(StreakTier::from_streak(4), Some(StreakTier::Amazing));
        assert_eq!(StreakTier::from_streak(5), Some(StreakTier::Outstanding));
        assert_eq!(StreakTier::from_streak(6), Some(StreakTier::Perfect));
        assert_eq!(StreakTier::from_streak(7), None);

        assert_eq!(streak_bonus(2), STREAK_BASE_POINTS);
        assert_eq!(streak_bonus(6), STREAK_BASE_POINTS * 5);
        assert_eq!(streak_bonus(9), 0);
    }

    #[test]
    fn test_combo_table() {
        let all = LaneOutcome {
            twenty_one: true,
            five_card: true,
            black_jack: true,
            bust: false,
        };
        assert_eq!(combo_bonus(&all), 1500);
        assert_eq!(
            combo_bonus(&LaneOutcome {
                twenty_one: false,
                ..all
            }),
            800
        );
        assert_eq!(
            combo_bonus(&LaneOutcome {
                five_card: false,
                black_jack: false,
                ..all
            }),
            0
        );
    }

    #[test]
    fn test_move_score_breakdown() {
        let o = eval("Kh 5c 6d");
        let s = calculate_move_score(&o, 3);
        assert_eq!(s.base, TWENTY_ONE_POINTS);
        assert_eq!(s.streak_bonus, STREAK_BASE_POINTS * 2);
        assert_eq!(s.combo_bonus, 0);
        assert_eq!(s.total, s.base + s.streak_bonus);
    }
}
