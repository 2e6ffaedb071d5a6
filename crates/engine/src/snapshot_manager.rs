//! Two-generation snapshot window and the undo paths built on it.
//!
//! `current` mirrors the live game after the latest move; `previous` is the
//! table before that move. Undo is available only while both are held, and
//! undoing consumes `previous`, so a second undo needs another move first.
//!
//! Animated undo runs three legs side by side and joins them on a [`Latch`]:
//!
//! - a lane the move had cleared gets its cards dealt back from a ghost deck,
//!   one card at a time with a pause between cards;
//! - the active card flies back onto the draw pile;
//! - the played card flies from its lane back to the active slot.
//!
//! Scores, counters and the snapshot rotation are only touched once all three
//! legs have signalled. A leg with nothing to animate signals at once.

use run21_core::{Deck, Game, Pile, StateSnapshot};
use run21_types::{Card, Lane};

use crate::config::EngineConfig;
use crate::latch::{Latch, Leg};
use crate::presenter::{Animation, Presenter, Ticket};
use crate::sequencer::EventSequencer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoPhase {
    NotStarted,
    AwaitingLegs,
    Reconciling,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UndoTiming {
    deal_card_ms: u32,
    deal_pause_ms: u32,
    move_card_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dealing {
    Idle,
    Card(Ticket),
    Pause(u32),
}

/// In-flight animated undo
#[derive(Debug)]
struct AnimatedUndo {
    latch: Latch,
    ghost: Option<(Lane, Deck)>,
    dealt: usize,
    dealing: Dealing,
    /// Ticket of the active-to-draw flight and the card it lands.
    to_draw: Option<(Ticket, Card)>,
    /// Ticket of the lane-to-active flight and the card it lands.
    to_active: Option<(Ticket, Card)>,
}

impl AnimatedUndo {
    fn new() -> Self {
        Self {
            latch: Latch::new(),
            ghost: None,
            dealt: 0,
            dealing: Dealing::Idle,
            to_draw: None,
            to_active: None,
        }
    }

    fn poll(&mut self, elapsed_ms: u32, game: &mut Game, presenter: &mut dyn Presenter, timing: &UndoTiming) {
        self.poll_deal(elapsed_ms, game, presenter, timing);

        if let Some((t, card)) = self.to_draw {
            if presenter.is_finished(t) {
                game.draw_mut().put_top_card(card);
                self.to_draw = None;
                self.latch.signal(Leg::ActiveToDrawDone);
            }
        }

        if let Some((t, card)) = self.to_active {
            if presenter.is_finished(t) {
                game.active_mut().put_top_card(card);
                self.to_active = None;
                self.latch.signal(Leg::LastPlayedToActiveDone);
            }
        }
    }

    fn poll_deal(&mut self, elapsed_ms: u32, game: &mut Game, presenter: &mut dyn Presenter, timing: &UndoTiming) {
        let Some((lane, ghost)) = self.ghost.as_ref() else {
            return;
        };
        let lane = *lane;

        loop {
            match self.dealing {
                Dealing::Idle => {
                    if self.dealt >= ghost.len() {
                        return;
                    }
                    self.dealing = Dealing::Card(deal(ghost, self.dealt, lane, presenter, timing));
                }
                Dealing::Card(t) => {
                    if !presenter.is_finished(t) {
                        return;
                    }
                    game.lane_mut(lane).put_top_card(ghost.cards()[self.dealt]);
                    self.dealt += 1;
                    if self.dealt >= ghost.len() {
                        self.dealing = Dealing::Idle;
                        self.latch.signal(Leg::ClearedLaneRestored);
                        return;
                    }
                    if timing.deal_pause_ms > 0 {
                        self.dealing = Dealing::Pause(timing.deal_pause_ms);
                        return;
                    }
                    self.dealing = Dealing::Card(deal(ghost, self.dealt, lane, presenter, timing));
                }
                Dealing::Pause(remaining) => {
                    let remaining = remaining.saturating_sub(elapsed_ms);
                    if remaining > 0 {
                        self.dealing = Dealing::Pause(remaining);
                        return;
                    }
                    self.dealing = Dealing::Card(deal(ghost, self.dealt, lane, presenter, timing));
                }
            }
        }
    }

    fn cancel(&mut self, presenter: &mut dyn Presenter) {
        if let Dealing::Card(t) = self.dealing {
            presenter.cancel(t);
        }
        for (t, _) in [self.to_draw.take(), self.to_active.take()].into_iter().flatten() {
            presenter.cancel(t);
        }
    }
}

fn deal(ghost: &Deck, index: usize, lane: Lane, presenter: &mut dyn Presenter, timing: &UndoTiming) -> Ticket {
    presenter.play(Animation::DealCard {
        card: ghost.cards()[index],
        lane,
        ms: timing.deal_card_ms,
    })
}

#[derive(Debug)]
pub struct SnapshotManager {
    current: Option<StateSnapshot>,
    previous: Option<StateSnapshot>,
    phase: UndoPhase,
    undo: Option<AnimatedUndo>,
    timing: UndoTiming,
}

impl SnapshotManager {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            current: None,
            previous: None,
            phase: UndoPhase::NotStarted,
            undo: None,
            timing: UndoTiming {
                deal_card_ms: config.deal_card_ms,
                deal_pause_ms: config.deal_pause_ms,
                move_card_ms: config.move_card_ms,
            },
        }
    }

    /// Capture the live game, demoting `current` to `previous`
    pub fn take_snapshot(&mut self, game: &Game) {
        self.previous = self.current.take();
        self.current = Some(StateSnapshot::capture(game));
        log::debug!(
            "snapshot taken: remaining {} score {} (undo available: {})",
            game.remaining(),
            game.score().total(),
            self.is_undo_available()
        );
    }

    pub fn is_undo_available(&self) -> bool {
        self.current.is_some() && self.previous.is_some()
    }

    pub fn is_undo_in_progress(&self) -> bool {
        matches!(self.phase, UndoPhase::AwaitingLegs | UndoPhase::Reconciling)
    }

    pub fn phase(&self) -> UndoPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&StateSnapshot> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&StateSnapshot> {
        self.previous.as_ref()
    }

    /// Legs signalled so far by the in-flight animated undo
    pub fn latch(&self) -> Option<Latch> {
        self.undo.as_ref().map(|u| u.latch)
    }

    /// Cards of the ghost deck still held by the in-flight animated undo
    pub fn ghost(&self) -> Option<&Deck> {
        self.undo.as_ref().and_then(|u| u.ghost.as_ref()).map(|(_, d)| d)
    }

    /// Restore the table to `previous` at once
    ///
    /// Returns false, without touching anything, when no undo is available.
    pub fn undo_non_animated(
        &mut self,
        game: &mut Game,
        sequencer: &mut EventSequencer,
        presenter: &mut dyn Presenter,
    ) -> bool {
        let (Some(current), Some(prev)) = (self.current.as_ref(), self.previous.as_ref()) else {
            log::debug!("undo rejected: no previous snapshot");
            return false;
        };
        let played = current.last_lane();

        for lane in Lane::ALL.into_iter().filter(|&l| Some(l) != played) {
            game.lane_mut(lane).replace_with(prev.lane(lane));
        }
        if let Some(lane) = played {
            game.lane_mut(lane).replace_with(prev.lane(lane));
        }
        game.draw_mut().replace_with(prev.draw());
        game.active_mut().replace_with(prev.active());

        self.undo_scores(game);
        self.rotate();
        sequencer.clear_popups(presenter);
        presenter.clear_outlines();

        log::info!("undo (instant): restored {:?}", played);
        true
    }

    /// Start the animated restore of `previous`
    ///
    /// Returns false when no undo is available or one is already running.
    /// Completion is driven by [`tick`](Self::tick).
    pub fn undo_animated(&mut self, game: &mut Game, presenter: &mut dyn Presenter) -> bool {
        if self.is_undo_in_progress() {
            log::warn!("undo rejected: already in progress");
            return false;
        }
        let (Some(current), Some(prev)) = (self.current.as_ref(), self.previous.as_ref()) else {
            log::debug!("undo rejected: no previous snapshot");
            return false;
        };
        let played = current.last_lane();
        let mut undo = AnimatedUndo::new();

        for lane in Lane::ALL.into_iter().filter(|&l| Some(l) != played) {
            game.lane_mut(lane).replace_with(prev.lane(lane));
        }

        // Lane: deal cleared cards back, or restore directly.
        match played {
            Some(lane) if current.lane(lane).is_empty() => {
                game.lane_mut(lane).clear();
                let ghost = Deck::from_cards(Pile::Ghost(lane), prev.lane(lane).cards().to_vec());
                if ghost.is_empty() {
                    undo.latch.signal(Leg::ClearedLaneRestored);
                } else {
                    undo.ghost = Some((lane, ghost));
                }
            }
            Some(lane) => {
                game.lane_mut(lane).replace_with(prev.lane(lane));
                undo.latch.signal(Leg::ClearedLaneRestored);
            }
            None => {
                undo.latch.signal(Leg::ClearedLaneRestored);
            }
        }

        // Active card back onto the draw pile.
        let active = game.active().top_card().copied();
        match (active, prev.draw().top_card().copied()) {
            (Some(card), Some(back)) => {
                let mut draw = prev.draw().clone();
                draw.take_top_card();
                game.draw_mut().replace_with(&draw);
                let t = presenter.play(Animation::CardMove {
                    card,
                    from: Pile::Active,
                    to: Pile::Draw,
                    ms: self.timing.move_card_ms,
                });
                undo.to_draw = Some((t, back));
            }
            _ => {
                game.draw_mut().replace_with(prev.draw());
                undo.latch.signal(Leg::ActiveToDrawDone);
            }
        }
        game.active_mut().clear();

        // Played card back to the active slot.
        match prev.active().top_card().copied() {
            Some(card) => {
                let t = presenter.play(Animation::CardMove {
                    card,
                    from: played.map_or(Pile::Active, Pile::Lane),
                    to: Pile::Active,
                    ms: self.timing.move_card_ms,
                });
                undo.to_active = Some((t, card));
            }
            None => {
                undo.latch.signal(Leg::LastPlayedToActiveDone);
            }
        }

        undo.poll(0, game, presenter, &self.timing);
        log::info!(
            "undo (animated) started: lane {:?}, ghost {} cards",
            played,
            undo.ghost.as_ref().map_or(0, |(_, d)| d.len())
        );
        self.undo = Some(undo);
        self.phase = UndoPhase::AwaitingLegs;
        true
    }

    /// Advance an in-flight animated undo
    ///
    /// Once every leg has signalled: scores and counters are restored, the
    /// snapshots rotate, popups and outlines are cleared and the ghost deck
    /// is dropped.
    pub fn tick(
        &mut self,
        elapsed_ms: u32,
        game: &mut Game,
        sequencer: &mut EventSequencer,
        presenter: &mut dyn Presenter,
    ) {
        if self.phase != UndoPhase::AwaitingLegs {
            return;
        }
        let Some(undo) = self.undo.as_mut() else {
            return;
        };
        undo.poll(elapsed_ms, game, presenter, &self.timing);
        if !undo.latch.is_open() {
            return;
        }

        self.phase = UndoPhase::Reconciling;
        self.undo_scores(game);
        self.rotate();
        sequencer.clear_popups(presenter);
        presenter.clear_outlines();
        self.undo = None;
        self.phase = UndoPhase::Done;
        log::info!("undo (animated) reconciled");
    }

    /// Restore score and counters from `previous`
    pub fn undo_scores(&self, game: &mut Game) -> bool {
        let Some(prev) = self.previous.as_ref() else {
            return false;
        };
        game.set_score(*prev.score());
        game.set_counters(prev.counters());
        true
    }

    /// Abandon any in-flight undo and forget both snapshots
    pub fn reset(&mut self, presenter: &mut dyn Presenter) {
        if let Some(mut undo) = self.undo.take() {
            undo.cancel(presenter);
        }
        self.current = None;
        self.previous = None;
        self.phase = UndoPhase::NotStarted;
    }

    fn rotate(&mut self) {
        if let Some(prev) = self.previous.take() {
            self.current = Some(prev);
        }
    }
}
