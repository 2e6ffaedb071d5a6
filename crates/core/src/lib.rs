//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the 21 Run rules, the card model, and the state types
//! the engine snapshots and restores. It has **zero dependencies** on
//! rendering, timing of animations, or I/O, making it:
//!
//! - **Deterministic**: Same seed deals the same shoe
//! - **Testable**: Unit tests for every rule
//! - **Portable**: Runs headless, in a terminal, or behind any presenter
//!
//! # Module Structure
//!
//! - [`deck`]: ordered piles of owned cards with deep-clone semantics
//! - [`score`]: total and per-lane score accumulators
//! - [`scoring`]: lane totals, outcomes, streak and combo tables
//! - [`event`]: score and game-over events produced by moves
//! - [`snapshot`]: deep copies of the table used for undo
//! - [`game_state`]: the live table, moves, round timer
//! - [`rng`]: seeded shoe shuffling
//!
//! # Game Rules
//!
//! - The active card is placed on top of one of four lanes.
//! - A lane totalling 21 (soft aces allowed), holding five cards without
//!   busting, or receiving a black jack (J♣/J♠) scores and is swept.
//! - A lane above 21 busts and is swept; three busts end the round.
//! - The round also ends when the shoe is exhausted or the timer runs out.
//!
//! # Example
//!
//! ```
//! use run21_core::Game;
//! use run21_types::Lane;
//!
//! let mut game = Game::new(12345);
//! game.start();
//!
//! let result = game.play(Lane::new(0)).unwrap();
//! assert_eq!(result.score.lane(), Lane::new(0));
//! assert_eq!(game.remaining(), 51);
//! ```

pub mod deck;
pub mod event;
pub mod game_state;
pub mod rng;
pub mod score;
pub mod scoring;
pub mod snapshot;

pub use run21_types as types;

// Re-export commonly used types for convenience
pub use deck::{ChangeKind, Deck, DeckChange, Pile};
pub use event::{GameEvent, GameOverEvent, ScoreEvent};
pub use game_state::{Game, MoveResult, PlayError};
pub use rng::{shuffled_shoe, ShoeRng};
pub use score::Score;
pub use scoring::{ComboKind, LaneOutcome, MoveScore, StreakTier};
pub use snapshot::{Counters, StateSnapshot};
