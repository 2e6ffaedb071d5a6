//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no behaviour beyond conversions, making them
//! usable in any context (rules, engine, terminal rendering).
//!
//! # Table Layout
//!
//! A 21 Run table has:
//!
//! - **Draw pile**: the shuffled shoe, top card is dealt to the active slot
//! - **Active slot**: the single card the player is about to place
//! - **Lanes**: 4 parallel columns (indexed 0-3), each holding its own pile
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `ROUND_MS` | 180000 | Length of a timed round |
//! | `DEAL_CARD_MS` | 120 | One card dealt back onto a lane during undo |
//! | `DEAL_PAUSE_MS` | 40 | Pause between two dealt cards |
//! | `MOVE_CARD_MS` | 200 | A card flying between piles |
//! | `SWEEP_MS` | 300 | Busted/cleared lane sweep |
//! | `GAME_OVER_GAP_MS` | 250 | Pause between game-over popups |
//!
//! # Scoring Constants
//!
//! | Outcome | Points |
//! |---------|--------|
//! | 21 | 400 |
//! | Five cards | 600 |
//! | Black jack | 200 |
//! | Streak tier | 250 × tier multiplier |
//! | Empty lane at game over | 500 each |
//! | No bust at game over | 1000 |
//! | Perfect game | 2500 |
//!
//! # Examples
//!
//! ```
//! use run21_types::{Card, Lane, Rank, Suit, GameAction};
//!
//! // Parse a card from two-character notation
//! let card = Card::try_from("Js").unwrap();
//! assert_eq!(card.rank(), Rank::Jack);
//! assert_eq!(card.suit(), Suit::Spade);
//! assert!(card.is_black_jack());
//!
//! // Face state is not part of identity
//! let mut flipped = card;
//! flipped.set_face_up(false);
//! assert!(card.card_equals(&flipped));
//!
//! // Lanes are checked indices
//! assert_eq!(Lane::try_from(3).unwrap().index(), 3);
//! assert!(Lane::try_from(4).is_err());
//!
//! // Parse game action
//! let action = GameAction::from_str("undo").unwrap();
//! assert_eq!(action, GameAction::Undo);
//! ```

use serde::{Deserialize, Serialize};

/// Number of lanes on the table (4 columns)
pub const LANES: usize = 4;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Length of a timed round (3 minutes)
pub const ROUND_MS: u32 = 180_000;

/// Duration of a single card dealt back onto a lane
pub const DEAL_CARD_MS: u32 = 120;

/// Pause between two consecutive dealt cards
pub const DEAL_PAUSE_MS: u32 = 40;

/// Duration of a card moving between two piles
pub const MOVE_CARD_MS: u32 = 200;

/// Duration of a busted/cleared lane sweep
pub const SWEEP_MS: u32 = 300;

/// Pause between two game-over popups
pub const GAME_OVER_GAP_MS: u32 = 250;

/// Lane total that scores
pub const TARGET_TOTAL: u8 = 21;

/// A lane holding this many cards without busting is cleared
pub const FIVE_CARD_COUNT: usize = 5;

/// Busts allowed before the round ends
pub const MAX_BUSTS: u32 = 3;

/// Points for a lane totalling exactly 21
pub const TWENTY_ONE_POINTS: u32 = 400;

/// Points for a five-card lane
pub const FIVE_CARD_POINTS: u32 = 600;

/// Points for a lane cleared by a black jack
pub const BLACK_JACK_POINTS: u32 = 200;

/// Base bonus for a streak tier (multiplied by the tier)
pub const STREAK_BASE_POINTS: u32 = 250;

/// Bonus per lane left empty at game over
pub const EMPTY_LANE_BONUS: u32 = 500;

/// Bonus for finishing without a single bust
pub const NO_BUST_BONUS: u32 = 1000;

/// Bonus for a perfect game
pub const PERFECT_GAME_BONUS: u32 = 2500;


/// Card rank, 2 through Ace (14)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    /// All ranks in ascending order
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Hard lane value: faces count 10, the ace counts 1
    ///
    /// The soft ace (11) is resolved when a whole lane is totalled.
    pub fn value(&self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            r => *r as u8,
        }
    }

    /// Single-character notation
    pub fn as_char(&self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

/// u8 isomorphism (2..=14)
impl From<Rank> for u8 {
    fn from(r: Rank) -> u8 {
        r as u8
    }
}
impl TryFrom<u8> for Rank {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            2..=14 => Ok(Rank::ALL[(n - 2) as usize]),
            _ => Err(format!("invalid rank: {}", n)),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = String;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.as_char() == c.to_ascii_uppercase())
            .ok_or_else(|| format!("invalid rank: {}", c))
    }
}

/// Card suit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    pub fn is_black(&self) -> bool {
        matches!(self, Suit::Club | Suit::Spade)
    }

    pub fn as_char(&self) -> char {
        match self {
            Suit::Club => 'c',
            Suit::Diamond => 'd',
            Suit::Heart => 'h',
            Suit::Spade => 's',
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = String;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_lowercase() {
            'c' => Ok(Suit::Club),
            'd' => Ok(Suit::Diamond),
            'h' => Ok(Suit::Heart),
            's' => Ok(Suit::Spade),
            _ => Err(format!("invalid suit: {}", c)),
        }
    }
}

/// A playing card
///
/// Identity is `(rank, suit)`. The face-up flag is presentation state only and
/// takes no part in equality or hashing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
    face_up: bool,
}

impl Card {
    /// Create a face-up card
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            face_up: true,
        }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn face_up(&self) -> bool {
        self.face_up
    }

    pub fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    /// Compare rank and suit, ignoring face state
    pub fn card_equals(&self, other: &Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }

    /// Jack of clubs or spades, the wild card that clears a lane
    pub fn is_black_jack(&self) -> bool {
        self.rank == Rank::Jack && self.suit.is_black()
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.card_equals(other)
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
        self.suit.hash(state);
    }
}

/// (Rank, Suit) isomorphism
impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self::new(r, s)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.as_char(), self.suit.as_char())
    }
}

/// str isomorphism
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => Ok(Card::new(Rank::try_from(r)?, Suit::try_from(s)?)),
            _ => Err("2 characters".into()),
        }
    }
}

impl Card {
    /// Parse a string of concatenated card notations, ignoring whitespace
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        s.replace(char::is_whitespace, "")
            .chars()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .map(|pair| Self::try_from(pair.as_str()))
            .collect::<Result<Vec<Self>, _>>()
    }
}

/// Lane index error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneError {
    OutOfRange(usize),
}

impl LaneError {
    pub fn code(self) -> &'static str {
        match self {
            LaneError::OutOfRange(_) => "lane_out_of_range",
        }
    }
}

impl std::fmt::Display for LaneError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LaneError::OutOfRange(i) => write!(f, "lane index {} outside 0..{}", i, LANES),
        }
    }
}

impl std::error::Error for LaneError {}

/// One of the four play columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lane(u8);

impl Lane {
    pub const ALL: [Lane; LANES] = [Lane(0), Lane(1), Lane(2), Lane(3)];

    /// Lane at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..4`. Use [`Lane::try_from`] for input
    /// that has not been validated yet.
    pub fn new(index: usize) -> Self {
        match Self::try_from(index) {
            Ok(lane) => lane,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for Lane {
    type Error = LaneError;
    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index < LANES {
            Ok(Lane(index as u8))
        } else {
            Err(LaneError::OutOfRange(index))
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "lane {}", self.0 + 1)
    }
}

/// Player actions fed to the engine
///
/// These actions are used by both keyboard input and scripted play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Place the active card into a lane
    Play(Lane),
    /// Undo the last move with animations
    Undo,
    /// Undo the last move instantly
    UndoInstant,
    /// Toggle pause state (stops the round timer)
    Pause,
    /// Deal a fresh round
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use run21_types::{GameAction, Lane};
    ///
    /// assert_eq!(GameAction::from_str("play2"), Some(GameAction::Play(Lane::new(2))));
    /// assert_eq!(GameAction::from_str("undoInstant"), Some(GameAction::UndoInstant));
    /// assert_eq!(GameAction::from_str("play9"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        if let Some(rest) = lower.strip_prefix("play") {
            let index = rest.parse::<usize>().ok()?;
            return Lane::try_from(index).ok().map(GameAction::Play);
        }
        match lower.as_str() {
            "undo" => Some(GameAction::Undo),
            "undoinstant" => Some(GameAction::UndoInstant),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Play(_) => "play",
            GameAction::Undo => "undo",
            GameAction::UndoInstant => "undoInstant",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}
