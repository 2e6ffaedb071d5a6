//! Game state module - the live 21 Run table
//!
//! This module ties together the decks, lane evaluation and scoring. It handles
//! dealing, placing the active card into a lane, sweeping scored or busted
//! lanes, the round timer, and the end-of-round bonuses.

use crate::deck::{Deck, Pile};
use crate::event::{GameOverEvent, ScoreEvent};
use crate::rng::{shuffled_shoe, ShoeRng};
use crate::score::Score;
use crate::scoring::{calculate_move_score, evaluate_lane};
use crate::snapshot::Counters;
use crate::types::*;

/// Reasons a move is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayError {
    NotStarted,
    Paused,
    GameOver,
    NoActiveCard,
}

impl PlayError {
    pub fn code(self) -> &'static str {
        match self {
            PlayError::NotStarted | PlayError::Paused | PlayError::GameOver => "not_playable",
            PlayError::NoActiveCard => "no_active_card",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlayError::NotStarted => "round has not started",
            PlayError::Paused => "round is paused",
            PlayError::GameOver => "round is over",
            PlayError::NoActiveCard => "no active card to place",
        }
    }
}

impl std::fmt::Display for PlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlayError {}

/// Events produced by one move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub score: ScoreEvent,
    pub game_over: Option<GameOverEvent>,
}

/// Complete live game state
#[derive(Debug, Clone)]
pub struct Game {
    draw: Deck,
    active: Deck,
    lanes: [Deck; LANES],
    score: Score,
    counters: Counters,
    seed: u32,
    /// Monotonic round id (increments on restart).
    round_id: u32,
    round_ms: u32,
    time_left_ms: u32,
    started: bool,
    paused: bool,
    game_over: bool,
}

impl Game {
    /// Create a new game with the given shuffle seed and the default round length
    pub fn new(seed: u32) -> Self {
        Self::with_round_ms(seed, ROUND_MS)
    }

    pub fn with_round_ms(seed: u32, round_ms: u32) -> Self {
        Self {
            draw: Deck::new(Pile::Draw),
            active: Deck::new(Pile::Active),
            lanes: Lane::ALL.map(|l| Deck::new(Pile::Lane(l))),
            score: Score::new(),
            counters: Counters::default(),
            seed,
            round_id: 0,
            round_ms,
            time_left_ms: round_ms,
            started: false,
            paused: false,
            game_over: false,
        }
    }

    /// Shuffle the shoe and deal the first active card
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.draw = shuffled_shoe(self.seed);
        self.deal_active();
        self.counters.remaining = self.count_remaining();
    }

    /// A started game dealing exactly `cards`, first card first
    ///
    /// The round ends when these cards run out. Used for scripted rounds.
    pub fn from_shoe(cards: Vec<Card>) -> Self {
        let mut game = Self::new(0);
        let mut order = cards;
        order.reverse();
        for card in order.iter_mut() {
            card.set_face_up(false);
        }
        game.started = true;
        game.draw = Deck::from_cards(Pile::Draw, order);
        game.deal_active();
        game.counters.remaining = game.count_remaining();
        game
    }

    /// Deal a fresh round with the next seed in sequence
    pub fn restart(&mut self) {
        let seed = ShoeRng::successor(self.seed);
        let next_round = self.round_id.wrapping_add(1);
        *self = Self::with_round_ms(seed, self.round_ms);
        self.round_id = next_round;
        self.start();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn round_id(&self) -> u32 {
        self.round_id
    }

    pub fn time_left_ms(&self) -> u32 {
        self.time_left_ms
    }

    pub fn draw(&self) -> &Deck {
        &self.draw
    }

    pub fn active(&self) -> &Deck {
        &self.active
    }

    pub fn active_card(&self) -> Option<&Card> {
        self.active.top_card()
    }

    pub fn lane(&self, lane: Lane) -> &Deck {
        &self.lanes[lane.index()]
    }

    /// Lane deck by raw index
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..4`.
    pub fn lane_at(&self, index: usize) -> &Deck {
        self.lane(Lane::new(index))
    }

    pub fn lanes(&self) -> &[Deck; LANES] {
        &self.lanes
    }

    pub fn score(&self) -> &Score {
        &self.score
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

    pub fn draw_mut(&mut self) -> &mut Deck {
        &mut self.draw
    }

    pub fn active_mut(&mut self) -> &mut Deck {
        &mut self.active
    }

    pub fn lane_mut(&mut self, lane: Lane) -> &mut Deck {
        &mut self.lanes[lane.index()]
    }

    pub fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    pub fn set_counters(&mut self, counters: Counters) {
        self.counters = counters;
    }

    pub fn toggle_pause(&mut self) {
        if self.started && !self.game_over {
            self.paused = !self.paused;
        }
    }

    /// Place the active card on top of `lane`
    ///
    /// Scoring and busted lanes are swept, the next card is dealt, and the
    /// round ends when the shoe runs out or the bust limit is reached.
    pub fn play(&mut self, lane: Lane) -> Result<MoveResult, PlayError> {
        if !self.started {
            return Err(PlayError::NotStarted);
        }
        if self.game_over {
            return Err(PlayError::GameOver);
        }
        if self.paused {
            return Err(PlayError::Paused);
        }
        let card = self.active.take_top_card().ok_or(PlayError::NoActiveCard)?;

        let deck = &mut self.lanes[lane.index()];
        deck.put_top_card(card);
        let outcome = evaluate_lane(deck, &card);
        let landed = deck.clone();
        if outcome.clears_lane() {
            deck.clear();
        }

        if outcome.is_scoring() {
            self.counters.streak += 1;
        } else if outcome.bust {
            self.counters.streak = 0;
            self.counters.busted += 1;
        }

        let points = calculate_move_score(&outcome, self.counters.streak);
        self.score.add(lane, points.total);

        self.deal_active();
        self.counters.remaining = self.count_remaining();
        self.counters.last_lane = Some(lane);

        let score = ScoreEvent::new(lane, landed, outcome, self.counters.streak, points);
        let game_over = if self.counters.busted >= MAX_BUSTS || self.counters.remaining == 0 {
            Some(self.finish(false))
        } else {
            None
        };

        Ok(MoveResult { score, game_over })
    }

    /// Advance the round timer
    ///
    /// Returns the game-over event when the timer runs out on this tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<GameOverEvent> {
        if !self.started || self.paused || self.game_over {
            return None;
        }
        self.time_left_ms = self.time_left_ms.saturating_sub(elapsed_ms);
        if self.time_left_ms == 0 {
            return Some(self.finish(true));
        }
        None
    }

    fn deal_active(&mut self) {
        if !self.active.is_empty() {
            return;
        }
        if let Some(mut card) = self.draw.take_top_card() {
            card.set_face_up(true);
            self.active.put_top_card(card);
        }
    }

    fn count_remaining(&self) -> u32 {
        (self.draw.len() + self.active.len()) as u32
    }

    fn finish(&mut self, time_expired: bool) -> GameOverEvent {
        self.game_over = true;
        self.paused = false;

        let emptied = Lane::ALL.map(|l| self.lanes[l.index()].is_empty());
        let busts = self.counters.busted;
        let perfect = !time_expired
            && busts == 0
            && self.counters.remaining == 0
            && emptied.iter().all(|&e| e);

        let empty_count = emptied.iter().filter(|&&e| e).count() as u32;
        self.score.add_bonus(empty_count * EMPTY_LANE_BONUS);
        if busts == 0 {
            self.score.add_bonus(NO_BUST_BONUS);
        }
        if perfect {
            self.score.add_bonus(PERFECT_GAME_BONUS);
        }

        log::info!(
            "round {} over: score {} busts {} perfect {} time_expired {}",
            self.round_id,
            self.score.total(),
            busts,
            perfect,
            time_expired
        );

        GameOverEvent {
            emptied,
            busts,
            perfect,
            time_expired,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged(cards: &str) -> Game {
        Game::from_shoe(Card::parse(cards).unwrap())
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(12345);
        assert!(!game.started());
        assert!(!game.game_over());
        assert_eq!(game.score().total(), 0);
        assert!(game.active().is_empty());
        assert_eq!(game.time_left_ms(), ROUND_MS);
    }

    #[test]
    fn test_start_deals_active_card() {
        let mut game = Game::new(12345);
        game.start();
        assert!(game.started());
        assert_eq!(game.active().len(), 1);
        assert!(game.active_card().unwrap().face_up());
        assert_eq!(game.draw().len(), 51);
        assert_eq!(game.remaining(), 52);
    }

    #[test]
    fn test_play_before_start() {
        let mut game = Game::new(1);
        assert_eq!(game.play(Lane::new(0)), Err(PlayError::NotStarted));
    }

    #[test]
    fn test_play_moves_card_and_deals_next() {
        let mut game = rigged("9c 4d 2h");
        let result = game.play(Lane::new(1)).unwrap();
        assert_eq!(game.lane(Lane::new(1)).to_string(), "9c");
        assert_eq!(game.active_card().unwrap().to_string(), "4d");
        assert_eq!(game.remaining(), 2);
        assert_eq!(game.last_lane(), Some(Lane::new(1)));
        assert!(!result.score.is_lane_outcome());
        assert!(result.game_over.is_none());
    }

    #[test]
    fn test_twenty_one_sweeps_lane_and_scores() {
        let mut game = rigged("Kh 5c 6d 2c");
        game.play(Lane::new(0)).unwrap();
        game.play(Lane::new(0)).unwrap();
        let result = game.play(Lane::new(0)).unwrap();
        assert!(result.score.twenty_one());
        assert_eq!(result.score.deck().len(), 3);
        assert!(game.lane(Lane::new(0)).is_empty());
        assert_eq!(game.score().lane(0), TWENTY_ONE_POINTS);
        assert_eq!(game.streak(), 1);
    }

    #[test]
    fn test_streak_survives_plain_placements() {
        let mut game = rigged("Ah Js Kc Jc 4d 9h");
        game.play(Lane::new(0)).unwrap();
        assert!(game.play(Lane::new(0)).unwrap().score.black_jack());
        game.play(Lane::new(1)).unwrap();
        let second = game.play(Lane::new(1)).unwrap().score;
        assert_eq!(second.streak(), 2);
        assert_eq!(second.points().streak_bonus, STREAK_BASE_POINTS);
        game.play(Lane::new(2)).unwrap();
        assert_eq!(game.streak(), 2);
        game.play(Lane::new(2)).unwrap();
        assert_eq!(game.streak(), 2);
    }

    #[test]
    fn test_bust_counts_and_ends_round() {
        let mut game = rigged("Kh Qh 5h Kd Qd 5d Kc Qc 5c 2s");
        for lane in 0..3 {
            game.play(Lane::new(lane)).unwrap();
            game.play(Lane::new(lane)).unwrap();
            let result = game.play(Lane::new(lane)).unwrap();
            assert!(result.score.bust());
            assert_eq!(game.streak(), 0);
            if lane < 2 {
                assert!(result.game_over.is_none());
            } else {
                let over = result.game_over.unwrap();
                assert_eq!(over.busts, MAX_BUSTS);
                assert!(!over.perfect);
            }
        }
        assert!(game.game_over());
        assert_eq!(game.play(Lane::new(3)), Err(PlayError::GameOver));
    }

    #[test]
    fn test_last_card_ends_round_with_bonuses() {
        let mut game = rigged("Kh Ad");
        game.play(Lane::new(0)).unwrap();
        let result = game.play(Lane::new(0)).unwrap();
        let over = result.game_over.unwrap();
        assert_eq!(over.emptied, [true; LANES]);
        assert_eq!(over.busts, 0);
        assert!(over.perfect);
        assert!(!over.time_expired);
        assert_eq!(
            game.score().total(),
            TWENTY_ONE_POINTS + 4 * EMPTY_LANE_BONUS + NO_BUST_BONUS + PERFECT_GAME_BONUS
        );
    }

    #[test]
    fn test_timer_expires() {
        let mut game = Game::with_round_ms(1, 100);
        game.start();
        assert!(game.tick(60).is_none());
        game.toggle_pause();
        assert!(game.tick(60).is_none());
        game.toggle_pause();
        let over = game.tick(60).unwrap();
        assert!(over.time_expired);
        assert!(!over.perfect);
        assert!(game.game_over());
        assert!(game.tick(16).is_none());
    }

    #[test]
    fn test_restart_increments_round_id() {
        let mut game = Game::new(5);
        game.start();
        game.play(Lane::new(0)).unwrap();
        game.restart();
        assert_eq!(game.round_id(), 1);
        assert!(game.lanes().iter().all(Deck::is_empty));
        assert_eq!(game.remaining(), 52);
        assert_ne!(game.seed(), 5);
    }

    #[test]
    fn test_from_shoe_deals_in_order() {
        let game = rigged("Kh 2c 3d");
        assert_eq!(game.active_card().unwrap().to_string(), "Kh");
        assert_eq!(game.draw().top_card().unwrap().to_string(), "2c");
        assert!(!game.draw().top_card().unwrap().face_up());
        assert_eq!(game.remaining(), 3);
    }

    #[test]
    #[should_panic]
    fn test_lane_at_out_of_range() {
        Game::new(1).lane_at(4);
    }
}
