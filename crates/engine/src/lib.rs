//! Turn-state reconciliation engine for 21 Run
//!
//! The engine sits between the rules in `run21-core` and whatever draws the
//! table. It owns three pieces of coordination:
//!
//! - [`snapshot_manager`]: two-generation snapshots for single-level undo,
//!   restored instantly or through three animated legs joined on a
//!   [`latch::Latch`]
//! - [`queue`]: per-lane FIFO of game events, one in flight at a time
//! - [`sequencer`]: expands events into ordered popup sequences and gates the
//!   game-over popups on every lane draining
//!
//! Everything is single-threaded and tick driven. The host calls
//! [`Engine::tick`] once per frame; every wait (card deals, popups, the undo
//! join, game-over gating) is a small state machine advanced inside that call.
//! Display and audio are injected through [`Presenter`] and [`Sound`].
//!
//! # Example
//!
//! ```
//! use run21_engine::{Engine, EngineConfig, Silent, TimedPresenter};
//! use run21_types::{GameAction, Lane, TICK_MS};
//!
//! let mut engine = Engine::with_config(EngineConfig::default(), TimedPresenter::new(), Silent);
//! engine.apply(GameAction::Play(Lane::new(0))).unwrap();
//! assert!(engine.is_undo_available());
//!
//! engine.apply(GameAction::Undo).unwrap();
//! while engine.is_undo_in_progress() {
//!     engine.tick(TICK_MS);
//! }
//! assert!(!engine.is_undo_available());
//! ```

pub mod config;
pub mod engine;
pub mod latch;
pub mod popup;
pub mod presenter;
pub mod queue;
pub mod sequencer;
pub mod snapshot_manager;

pub use run21_core as core;
pub use run21_types as types;

pub use config::EngineConfig;
pub use engine::{Engine, EngineError, RoundSummary};
pub use latch::{Latch, Leg};
pub use popup::{GameOverSequence, PopupKind, PopupSequence};
pub use presenter::{Animation, Cue, Presenter, Silent, Sound, Ticket, TimedPresenter};
pub use queue::{Job, LaneEventQueue, Processor};
pub use sequencer::EventSequencer;
pub use snapshot_manager::{SnapshotManager, UndoPhase};
