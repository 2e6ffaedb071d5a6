//! Display and audio capabilities injected into the engine.
//!
//! The engine never looks inside an animation. It asks a [`Presenter`] to play
//! one, keeps the returned [`Ticket`], and polls [`Presenter::is_finished`] once
//! per tick. [`TimedPresenter`] is the headless implementation: it finishes
//! every animation after its declared duration on the tick clock.

use run21_core::{Deck, Pile, StreakTier};
use run21_types::{Card, Lane};

use crate::popup::PopupKind;

/// Handle to a started animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u32);

impl Ticket {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

/// Something for the display layer to show
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Show a popup, hold it, dismiss it.
    Popup { kind: PopupKind, hold_ms: u32 },
    /// Deal one card from a ghost deck onto a lane.
    DealCard { card: Card, lane: Lane, ms: u32 },
    /// Fly a card between two piles.
    CardMove {
        card: Card,
        from: Pile,
        to: Pile,
        ms: u32,
    },
    BustedDeck { deck: Deck, ms: u32 },
    ClearedDeck { deck: Deck, ms: u32 },
}

impl Animation {
    pub fn duration_ms(&self) -> u32 {
        match self {
            Animation::Popup { hold_ms, .. } => *hold_ms,
            Animation::DealCard { ms, .. }
            | Animation::CardMove { ms, .. }
            | Animation::BustedDeck { ms, .. }
            | Animation::ClearedDeck { ms, .. } => *ms,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Animation::Popup { .. } => "popup",
            Animation::DealCard { .. } => "deal_card",
            Animation::CardMove { .. } => "card_move",
            Animation::BustedDeck { .. } => "busted_deck",
            Animation::ClearedDeck { .. } => "cleared_deck",
        }
    }

    pub fn popup(&self) -> Option<PopupKind> {
        match self {
            Animation::Popup { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Opaque "play animation, then signal completion" capability
pub trait Presenter {
    fn play(&mut self, animation: Animation) -> Ticket;

    /// True once the animation completed or was cancelled. Unknown tickets
    /// count as finished.
    fn is_finished(&self, ticket: Ticket) -> bool;

    fn cancel(&mut self, ticket: Ticket);

    /// Remove lane highlight outlines.
    fn clear_outlines(&mut self);

    /// Advance the presenter's own clock. Called once per engine tick before
    /// anything polls a ticket.
    fn advance(&mut self, _elapsed_ms: u32) {}
}

/// Audio cue keyed by event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Score,
    Bust,
    Streak(StreakTier),
    Bonus,
    GameOver,
    Undo,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Score => "score",
            Cue::Bust => "bust",
            Cue::Streak(_) => "streak",
            Cue::Bonus => "bonus",
            Cue::GameOver => "game_over",
            Cue::Undo => "undo",
        }
    }
}

/// Fire-and-forget audio capability
///
/// Implementations swallow their own failures; a cue never blocks the caller.
pub trait Sound {
    fn cue(&mut self, cue: Cue);
}

/// Sound sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Sound for Silent {
    fn cue(&mut self, _cue: Cue) {}
}

/// Records every cue; handy for scripted runs and tests
impl Sound for Vec<Cue> {
    fn cue(&mut self, cue: Cue) {
        self.push(cue);
    }
}

#[derive(Debug, Clone)]
struct Running {
    ticket: Ticket,
    remaining_ms: u32,
    animation: Animation,
}

/// Headless presenter driven by the engine tick
///
/// Each animation finishes once its duration has elapsed. Zero-length
/// animations finish immediately.
#[derive(Debug, Default)]
pub struct TimedPresenter {
    next_ticket: u32,
    running: Vec<Running>,
    started: Vec<Animation>,
    outline_clears: u32,
}

impl TimedPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animations still playing, oldest first
    pub fn running(&self) -> impl Iterator<Item = &Animation> + '_ {
        self.running.iter().map(|r| &r.animation)
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Popups currently on screen
    pub fn visible_popups(&self) -> impl Iterator<Item = PopupKind> + '_ {
        self.running().filter_map(Animation::popup)
    }

    /// Drain every animation started since the last call
    pub fn take_started(&mut self) -> Vec<Animation> {
        std::mem::take(&mut self.started)
    }

    pub fn outline_clears(&self) -> u32 {
        self.outline_clears
    }
}

impl Presenter for TimedPresenter {
    fn play(&mut self, animation: Animation) -> Ticket {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = Ticket(self.next_ticket);
        let remaining_ms = animation.duration_ms();

        log::debug!("animation {} start {:?} ({}ms)", ticket.0, animation.as_str(), remaining_ms);
        if remaining_ms > 0 {
            self.running.push(Running {
                ticket,
                remaining_ms,
                animation: animation.clone(),
            });
        }
        self.started.push(animation);
        ticket
    }

    fn is_finished(&self, ticket: Ticket) -> bool {
        !self.running.iter().any(|r| r.ticket == ticket)
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.running.retain(|r| r.ticket != ticket);
    }

    fn clear_outlines(&mut self) {
        self.outline_clears += 1;
    }

    fn advance(&mut self, elapsed_ms: u32) {
        for r in self.running.iter_mut() {
            r.remaining_ms = r.remaining_ms.saturating_sub(elapsed_ms);
        }
        self.running.retain(|r| r.remaining_ms > 0);
    }
}
