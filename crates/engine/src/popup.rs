//! Popup tables and the per-event popup sequences.
//!
//! A score event expands into a fixed-priority list of popups; a game-over
//! event into its end-of-round bonuses. Each list is shown one popup at a
//! time: show, hold for the kind's duration, dismiss, next.

use arrayvec::ArrayVec;

use run21_core::{ComboKind, GameOverEvent, ScoreEvent, StreakTier};
use run21_types::{Lane, EMPTY_LANE_BONUS, NO_BUST_BONUS, PERFECT_GAME_BONUS};

use crate::config::EngineConfig;
use crate::presenter::{Animation, Cue, Presenter, Sound, Ticket};
use crate::queue::Job;

/// Longest list either table can produce
pub const MAX_POPUPS: usize = 8;

pub type PopupList = ArrayVec<PopupKind, MAX_POPUPS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupKind {
    ComboBanner(ComboKind),
    TwentyOne,
    Bust,
    FiveCard,
    BlackJack,
    Streak(StreakTier),
    ComboBonus(ComboKind),
    OutOfTime,
    EmptyLane(Lane),
    NoBust,
    PerfectGame,
}

impl PopupKind {
    /// Hold duration before scaling
    pub fn hold_ms(&self) -> u32 {
        match self {
            PopupKind::ComboBanner(_) | PopupKind::ComboBonus(_) => 900,
            PopupKind::TwentyOne | PopupKind::Bust | PopupKind::FiveCard | PopupKind::BlackJack => 700,
            PopupKind::Streak(_) => 800,
            PopupKind::OutOfTime => 1200,
            PopupKind::EmptyLane(_) => 600,
            PopupKind::NoBust => 900,
            PopupKind::PerfectGame => 1500,
        }
    }

    /// Cue played when the popup appears
    pub fn cue(&self) -> Option<Cue> {
        match self {
            PopupKind::TwentyOne | PopupKind::FiveCard | PopupKind::BlackJack => Some(Cue::Score),
            PopupKind::Bust => Some(Cue::Bust),
            PopupKind::Streak(tier) => Some(Cue::Streak(*tier)),
            PopupKind::ComboBanner(_)
            | PopupKind::ComboBonus(_)
            | PopupKind::EmptyLane(_)
            | PopupKind::NoBust
            | PopupKind::PerfectGame => Some(Cue::Bonus),
            PopupKind::OutOfTime => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PopupKind::ComboBanner(_) => "combo_banner",
            PopupKind::TwentyOne => "twenty_one",
            PopupKind::Bust => "bust",
            PopupKind::FiveCard => "five_card",
            PopupKind::BlackJack => "black_jack",
            PopupKind::Streak(_) => "streak",
            PopupKind::ComboBonus(_) => "combo_bonus",
            PopupKind::OutOfTime => "out_of_time",
            PopupKind::EmptyLane(_) => "empty_lane",
            PopupKind::NoBust => "no_bust",
            PopupKind::PerfectGame => "perfect_game",
        }
    }
}

impl std::fmt::Display for PopupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PopupKind::ComboBanner(_) => write!(f, "COMBO!"),
            PopupKind::TwentyOne => write!(f, "21!"),
            PopupKind::Bust => write!(f, "BUST"),
            PopupKind::FiveCard => write!(f, "FIVE CARDS"),
            PopupKind::BlackJack => write!(f, "BLACK JACK"),
            PopupKind::Streak(tier) => {
                write!(f, "{} STREAK +{}", tier.as_str().to_uppercase(), tier.bonus())
            }
            PopupKind::ComboBonus(combo) => write!(f, "COMBO +{}", combo.points()),
            PopupKind::OutOfTime => write!(f, "TIME UP"),
            PopupKind::EmptyLane(lane) => write!(f, "EMPTY LANE {} +{}", lane.index() + 1, EMPTY_LANE_BONUS),
            PopupKind::NoBust => write!(f, "NO BUST +{}", NO_BUST_BONUS),
            PopupKind::PerfectGame => write!(f, "PERFECT GAME +{}", PERFECT_GAME_BONUS),
        }
    }
}

/// Popups for a score event, in display order
///
/// Combo banner, 21, bust, five cards, black jack, streak tier, combo bonus.
pub fn score_popups(event: &ScoreEvent) -> PopupList {
    let mut popups = PopupList::new();
    let combo = event.combo();

    if let Some(c) = combo {
        popups.push(PopupKind::ComboBanner(c));
    }
    if event.twenty_one() {
        popups.push(PopupKind::TwentyOne);
    }
    if event.bust() {
        popups.push(PopupKind::Bust);
    }
    if event.five_card() {
        popups.push(PopupKind::FiveCard);
    }
    if event.black_jack() {
        popups.push(PopupKind::BlackJack);
    }
    if let Some(tier) = event.streak_tier() {
        popups.push(PopupKind::Streak(tier));
    }
    if let Some(c) = combo {
        popups.push(PopupKind::ComboBonus(c));
    }
    popups
}

/// End-of-round popups, in display order
pub fn game_over_popups(event: &GameOverEvent) -> PopupList {
    let mut popups = PopupList::new();
    if event.time_expired {
        popups.push(PopupKind::OutOfTime);
    }
    for lane in event.emptied_lanes() {
        popups.push(PopupKind::EmptyLane(lane));
    }
    if event.busts == 0 {
        popups.push(PopupKind::NoBust);
    }
    if event.perfect {
        popups.push(PopupKind::PerfectGame);
    }
    popups
}

fn show(
    kind: PopupKind,
    presenter: &mut dyn Presenter,
    sound: &mut dyn Sound,
    config: &EngineConfig,
) -> Ticket {
    if let Some(cue) = kind.cue() {
        sound.cue(cue);
    }
    presenter.play(Animation::Popup {
        kind,
        hold_ms: config.popup_ms(kind.hold_ms()),
    })
}

/// The popups of one score event, shown back to back
#[derive(Debug, Clone)]
pub struct PopupSequence {
    popups: PopupList,
    next: usize,
    showing: Option<Ticket>,
}

impl PopupSequence {
    pub fn new(popups: PopupList) -> Self {
        Self {
            popups,
            next: 0,
            showing: None,
        }
    }

    pub fn popups(&self) -> &[PopupKind] {
        &self.popups
    }

    /// Popup on screen right now
    pub fn showing(&self) -> Option<PopupKind> {
        self.showing.and(self.next.checked_sub(1)).map(|i| self.popups[i])
    }

    /// Start the next popup once the current one is gone
    ///
    /// Zero-length popups are skipped through in a single call.
    pub fn poll(&mut self, presenter: &mut dyn Presenter, sound: &mut dyn Sound, config: &EngineConfig) {
        while self.showing.map_or(true, |t| presenter.is_finished(t)) {
            match self.popups.get(self.next) {
                Some(&kind) => {
                    self.next += 1;
                    self.showing = Some(show(kind, presenter, sound, config));
                }
                None => {
                    self.showing = None;
                    return;
                }
            }
        }
    }
}

impl Job for PopupSequence {
    fn is_finished(&self) -> bool {
        self.showing.is_none() && self.next >= self.popups.len()
    }

    fn cancel(&mut self, presenter: &mut dyn Presenter) {
        if let Some(t) = self.showing.take() {
            presenter.cancel(t);
        }
        self.next = self.popups.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverState {
    /// Lane queues still have events in flight.
    Waiting,
    Showing(Ticket),
    Gap(u32),
    Done,
}

/// End-of-round popups, held back until every lane queue has drained
#[derive(Debug, Clone)]
pub struct GameOverSequence {
    popups: PopupList,
    next: usize,
    state: GameOverState,
}

impl GameOverSequence {
    pub fn new(popups: PopupList) -> Self {
        Self {
            popups,
            next: 0,
            state: GameOverState::Waiting,
        }
    }

    pub fn popups(&self) -> &[PopupKind] {
        &self.popups
    }

    pub fn state(&self) -> GameOverState {
        self.state
    }

    pub fn step(
        &mut self,
        elapsed_ms: u32,
        lanes_drained: bool,
        presenter: &mut dyn Presenter,
        sound: &mut dyn Sound,
        config: &EngineConfig,
    ) {
        if let GameOverState::Gap(remaining) = self.state {
            let remaining = remaining.saturating_sub(elapsed_ms);
            if remaining > 0 {
                self.state = GameOverState::Gap(remaining);
                return;
            }
            self.show_next(presenter, sound, config);
        }
        self.advance(lanes_drained, presenter, sound, config);
    }

    /// Move through every state reachable without waiting on the clock
    pub fn advance(
        &mut self,
        lanes_drained: bool,
        presenter: &mut dyn Presenter,
        sound: &mut dyn Sound,
        config: &EngineConfig,
    ) {
        loop {
            match self.state {
                GameOverState::Waiting => {
                    if !lanes_drained {
                        return;
                    }
                    log::info!("game over sequence: {} popups", self.popups.len());
                    sound.cue(Cue::GameOver);
                    self.show_next(presenter, sound, config);
                }
                GameOverState::Showing(t) => {
                    if !presenter.is_finished(t) {
                        return;
                    }
                    if self.next >= self.popups.len() {
                        self.state = GameOverState::Done;
                    } else if config.game_over_gap_ms == 0 {
                        self.show_next(presenter, sound, config);
                    } else {
                        self.state = GameOverState::Gap(config.game_over_gap_ms);
                        return;
                    }
                }
                GameOverState::Gap(_) | GameOverState::Done => return,
            }
        }
    }

    fn show_next(&mut self, presenter: &mut dyn Presenter, sound: &mut dyn Sound, config: &EngineConfig) {
        match self.popups.get(self.next) {
            Some(&kind) => {
                self.next += 1;
                self.state = GameOverState::Showing(show(kind, presenter, sound, config));
            }
            None => self.state = GameOverState::Done,
        }
    }
}

impl Job for GameOverSequence {
    fn is_finished(&self) -> bool {
        self.state == GameOverState::Done
    }

    fn cancel(&mut self, presenter: &mut dyn Presenter) {
        if let GameOverState::Showing(t) = self.state {
            presenter.cancel(t);
        }
        self.state = GameOverState::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run21_core::{Deck, LaneOutcome, MoveScore, Pile};
    use run21_types::LANES;

    use crate::presenter::{Silent, TimedPresenter};

    fn score(outcome: LaneOutcome, streak: u32) -> ScoreEvent {
        let deck = Deck::new(Pile::Lane(Lane::new(0)));
        ScoreEvent::new(Lane::new(0), deck, outcome, streak, MoveScore::default())
    }

    fn over(emptied: [bool; LANES], busts: u32, perfect: bool, time_expired: bool) -> GameOverEvent {
        GameOverEvent {
            emptied,
            busts,
            perfect,
            time_expired,
        }
    }

    #[test]
    fn test_score_popup_order() {
        let outcome = LaneOutcome {
            twenty_one: true,
            five_card: true,
            black_jack: true,
            bust: false,
        };
        let popups = score_popups(&score(outcome, 4));
        assert_eq!(
            popups.as_slice(),
            &[
                PopupKind::ComboBanner(ComboKind::TwentyOneFiveCardBlackJack),
                PopupKind::TwentyOne,
                PopupKind::FiveCard,
                PopupKind::BlackJack,
                PopupKind::Streak(StreakTier::Amazing),
                PopupKind::ComboBonus(ComboKind::TwentyOneFiveCardBlackJack),
            ]
        );
    }

    #[test]
    fn test_bust_has_single_popup() {
        let outcome = LaneOutcome {
            bust: true,
            ..LaneOutcome::default()
        };
        assert_eq!(score_popups(&score(outcome, 0)).as_slice(), &[PopupKind::Bust]);
    }

    #[test]
    fn test_streak_popup_table() {
        let scoring = LaneOutcome {
            twenty_one: true,
            ..LaneOutcome::default()
        };
        let streak_popup = |streak| {
            score_popups(&score(scoring, streak))
                .iter()
                .find_map(|p| match p {
                    PopupKind::Streak(t) => Some(*t),
                    _ => None,
                })
        };
        assert_eq!(streak_popup(1), None);
        assert_eq!(streak_popup(2), Some(StreakTier::Good));
        assert_eq!(streak_popup(6), Some(StreakTier::Perfect));
        assert_eq!(streak_popup(7), None);
    }

    #[test]
    fn test_plain_placement_has_no_popups() {
        let seq = PopupSequence::new(score_popups(&score(LaneOutcome::default(), 3)));
        assert!(seq.is_finished());
    }

    #[test]
    fn test_game_over_popup_order() {
        let popups = game_over_popups(&over([true, false, true, false], 0, false, true));
        assert_eq!(
            popups.as_slice(),
            &[
                PopupKind::OutOfTime,
                PopupKind::EmptyLane(Lane::new(0)),
                PopupKind::EmptyLane(Lane::new(2)),
                PopupKind::NoBust,
            ]
        );
        let popups = game_over_popups(&over([true; LANES], 0, true, false));
        assert_eq!(popups.len(), 6);
        assert_eq!(popups.last(), Some(&PopupKind::PerfectGame));
    }

    #[test]
    fn test_sequence_shows_one_at_a_time() {
        let config = EngineConfig::default();
        let mut presenter = TimedPresenter::new();
        let mut cues: Vec<Cue> = Vec::new();
        let mut popups = PopupList::new();
        popups.push(PopupKind::TwentyOne);
        popups.push(PopupKind::Streak(StreakTier::Good));

        let mut seq = PopupSequence::new(popups);
        seq.poll(&mut presenter, &mut cues, &config);
        assert_eq!(seq.showing(), Some(PopupKind::TwentyOne));
        assert_eq!(presenter.visible_popups().count(), 1);

        presenter.advance(700);
        seq.poll(&mut presenter, &mut cues, &config);
        assert_eq!(seq.showing(), Some(PopupKind::Streak(StreakTier::Good)));

        presenter.advance(800);
        seq.poll(&mut presenter, &mut cues, &config);
        assert!(seq.is_finished());
        assert_eq!(cues, vec![Cue::Score, Cue::Streak(StreakTier::Good)]);
    }

    #[test]
    fn test_game_over_waits_then_gaps() {
        let config = EngineConfig::default();
        let mut presenter = TimedPresenter::new();
        let mut sound = Silent;
        let mut seq = GameOverSequence::new(game_over_popups(&over([false; LANES], 0, false, true)));

        seq.advance(false, &mut presenter, &mut sound, &config);
        assert_eq!(seq.state(), GameOverState::Waiting);

        seq.step(16, true, &mut presenter, &mut sound, &config);
        assert!(matches!(seq.state(), GameOverState::Showing(_)));

        presenter.advance(PopupKind::OutOfTime.hold_ms());
        seq.step(16, true, &mut presenter, &mut sound, &config);
        assert_eq!(seq.state(), GameOverState::Gap(config.game_over_gap_ms));

        seq.step(config.game_over_gap_ms, true, &mut presenter, &mut sound, &config);
        assert_eq!(presenter.visible_popups().collect::<Vec<_>>(), vec![PopupKind::NoBust]);

        presenter.advance(PopupKind::NoBust.hold_ms());
        seq.step(16, true, &mut presenter, &mut sound, &config);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_cancel_finishes_sequences() {
        let config = EngineConfig::default();
        let mut presenter = TimedPresenter::new();
        let mut sound = Silent;
        let mut popups = PopupList::new();
        popups.push(PopupKind::Bust);
        let mut seq = PopupSequence::new(popups);
        seq.poll(&mut presenter, &mut sound, &config);
        seq.cancel(&mut presenter);
        assert!(seq.is_finished());
        assert_eq!(presenter.running_count(), 0);
    }
}
