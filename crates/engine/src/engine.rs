//! The engine: live game, snapshot window, event sequencer and the injected
//! capabilities, stepped together once per tick.

use serde::Serialize;

use run21_core::{Game, GameEvent, PlayError};
use run21_types::{GameAction, Lane, LANES};

use crate::config::EngineConfig;
use crate::presenter::{Cue, Presenter, Sound};
use crate::sequencer::EventSequencer;
use crate::snapshot_manager::SnapshotManager;

/// Why an action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    Play(PlayError),
    UndoInProgress,
}

impl EngineError {
    pub fn code(self) -> &'static str {
        match self {
            EngineError::Play(e) => e.code(),
            EngineError::UndoInProgress => "undo_in_progress",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EngineError::Play(e) => e.message(),
            EngineError::UndoInProgress => "an undo is still animating",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for EngineError {}

impl From<PlayError> for EngineError {
    fn from(e: PlayError) -> Self {
        EngineError::Play(e)
    }
}

/// End-of-round record written to the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round_id: u32,
    pub seed: u32,
    pub score: u32,
    pub lane_scores: [u32; LANES],
    pub busts: u32,
    pub remaining: u32,
    pub time_left_ms: u32,
    pub game_over: bool,
}

pub struct Engine<P, S> {
    game: Game,
    config: EngineConfig,
    snapshots: SnapshotManager,
    sequencer: EventSequencer,
    presenter: P,
    sound: S,
}

impl<P: Presenter, S: Sound> Engine<P, S> {
    /// Wrap `game`, starting it if needed, and take the first snapshot
    pub fn new(mut game: Game, config: EngineConfig, presenter: P, sound: S) -> Self {
        game.start();
        let mut snapshots = SnapshotManager::new(&config);
        snapshots.take_snapshot(&game);
        let sequencer = EventSequencer::new(&config);
        Self {
            game,
            config,
            snapshots,
            sequencer,
            presenter,
            sound,
        }
    }

    /// A fresh seeded round configured by `config`
    pub fn with_config(config: EngineConfig, presenter: P, sound: S) -> Self {
        let game = Game::with_round_ms(config.seed, config.round_ms);
        Self::new(game, config, presenter, sound)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    pub fn sequencer(&self) -> &EventSequencer {
        &self.sequencer
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn is_undo_available(&self) -> bool {
        self.snapshots.is_undo_available()
    }

    pub fn is_undo_in_progress(&self) -> bool {
        self.snapshots.is_undo_in_progress()
    }

    /// Apply a player action
    ///
    /// `Ok(false)` means the action was valid but had nothing to do (no undo
    /// available, round already over).
    pub fn apply(&mut self, action: GameAction) -> Result<bool, EngineError> {
        match action {
            GameAction::Play(lane) => self.play(lane),
            GameAction::Undo => self.undo(true),
            GameAction::UndoInstant => self.undo(false),
            GameAction::Pause => {
                self.game.toggle_pause();
                Ok(true)
            }
            GameAction::Restart => {
                self.restart();
                Ok(true)
            }
        }
    }

    /// Advance the presenter clock, the round timer, any animated undo and
    /// the event queues
    ///
    /// The round timer is held while an animated undo is in flight.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.presenter.advance(elapsed_ms);

        if !self.snapshots.is_undo_in_progress() {
            if let Some(over) = self.game.tick(elapsed_ms) {
                self.sequencer
                    .route(GameEvent::GameOver(over), &mut self.presenter, &mut self.sound);
            }
        }

        self.snapshots.tick(
            elapsed_ms,
            &mut self.game,
            &mut self.sequencer,
            &mut self.presenter,
        );
        self.sequencer
            .tick(elapsed_ms, &mut self.presenter, &mut self.sound);
    }

    pub fn summary(&self) -> RoundSummary {
        let score = self.game.score();
        RoundSummary {
            round_id: self.game.round_id(),
            seed: self.game.seed(),
            score: score.total(),
            lane_scores: Lane::ALL.map(|l| score.lane_score(l)),
            busts: self.game.busted(),
            remaining: self.game.remaining(),
            time_left_ms: self.game.time_left_ms(),
            game_over: self.game.game_over(),
        }
    }

    fn play(&mut self, lane: Lane) -> Result<bool, EngineError> {
        if self.snapshots.is_undo_in_progress() {
            return Err(EngineError::UndoInProgress);
        }
        let result = self.game.play(lane)?;
        self.snapshots.take_snapshot(&self.game);

        log::debug!(
            "{} -> {} (streak {}, +{})",
            lane,
            result.score.deck(),
            result.score.streak(),
            result.score.points().total
        );
        self.sequencer
            .route(result.score.into(), &mut self.presenter, &mut self.sound);
        if let Some(over) = result.game_over {
            self.sequencer
                .route(over.into(), &mut self.presenter, &mut self.sound);
        }
        Ok(true)
    }

    fn undo(&mut self, animated: bool) -> Result<bool, EngineError> {
        if self.snapshots.is_undo_in_progress() {
            return Err(EngineError::UndoInProgress);
        }
        if self.game.game_over() || self.game.paused() {
            log::debug!("undo ignored: round not in play");
            return Ok(false);
        }
        let done = if animated {
            self.snapshots.undo_animated(&mut self.game, &mut self.presenter)
        } else {
            self.snapshots
                .undo_non_animated(&mut self.game, &mut self.sequencer, &mut self.presenter)
        };
        if done {
            self.sound.cue(Cue::Undo);
        }
        Ok(done)
    }

    fn restart(&mut self) {
        self.snapshots.reset(&mut self.presenter);
        self.sequencer.clear_popups(&mut self.presenter);
        self.presenter.clear_outlines();
        self.game.restart();
        self.snapshots.take_snapshot(&self.game);
        log::info!("round {} started (seed {})", self.game.round_id(), self.game.seed());
    }
}
