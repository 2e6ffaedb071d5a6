//! Routes game events to their queues and drives the popups.
//!
//! Score events go to the queue of their lane, game-over events to a fifth
//! queue that holds back until all four lanes have drained. Lane sweep
//! animations run beside the queues as ad hoc visuals and never block them.

use run21_core::{Deck, GameEvent};
use run21_types::{Lane, LANES};

use crate::config::EngineConfig;
use crate::popup::{
    game_over_popups, score_popups, GameOverSequence, PopupKind, PopupList, PopupSequence,
};
use crate::presenter::{Animation, Presenter, Sound, Ticket};
use crate::queue::{LaneEventQueue, Processor};

const LANE_LABELS: [&str; LANES] = ["lane 1", "lane 2", "lane 3", "lane 4"];

/// Capabilities handed to the queues for one call
struct Stage<'a> {
    presenter: &'a mut dyn Presenter,
    sound: &'a mut dyn Sound,
    config: &'a EngineConfig,
    lanes_drained: bool,
}

impl Processor<PopupSequence> for Stage<'_> {
    fn begin(&mut self, event: &GameEvent) -> PopupSequence {
        let popups = match event {
            GameEvent::Score(e) => score_popups(e),
            GameEvent::GameOver(_) => PopupList::new(),
        };
        let mut seq = PopupSequence::new(popups);
        seq.poll(&mut *self.presenter, &mut *self.sound, self.config);
        seq
    }

    fn step(&mut self, job: &mut PopupSequence, _elapsed_ms: u32) {
        job.poll(&mut *self.presenter, &mut *self.sound, self.config);
    }
}

impl Processor<GameOverSequence> for Stage<'_> {
    fn begin(&mut self, event: &GameEvent) -> GameOverSequence {
        let popups = match event {
            GameEvent::GameOver(e) => game_over_popups(e),
            GameEvent::Score(_) => PopupList::new(),
        };
        let mut seq = GameOverSequence::new(popups);
        seq.advance(self.lanes_drained, &mut *self.presenter, &mut *self.sound, self.config);
        seq
    }

    fn step(&mut self, job: &mut GameOverSequence, elapsed_ms: u32) {
        job.step(
            elapsed_ms,
            self.lanes_drained,
            &mut *self.presenter,
            &mut *self.sound,
            self.config,
        );
    }
}

#[derive(Debug)]
pub struct EventSequencer {
    config: EngineConfig,
    lanes: [LaneEventQueue<PopupSequence>; LANES],
    game_over: LaneEventQueue<GameOverSequence>,
    ad_hoc: Vec<Ticket>,
}

impl EventSequencer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
            lanes: LANE_LABELS.map(LaneEventQueue::new),
            game_over: LaneEventQueue::new("game over"),
            ad_hoc: Vec::new(),
        }
    }

    /// Queue `event` behind earlier events of the same lane
    pub fn route(&mut self, event: GameEvent, presenter: &mut dyn Presenter, sound: &mut dyn Sound) {
        if let GameEvent::Score(e) = &event {
            if e.is_lane_outcome() {
                self.start_sweeps(e.deck(), presenter);
            }
        }

        match event.lane() {
            Some(lane) => {
                let mut stage = Stage {
                    presenter,
                    sound,
                    config: &self.config,
                    lanes_drained: false,
                };
                self.lanes[lane.index()].enqueue(event, &mut stage);
            }
            None => {
                let lanes_drained = self.lanes_drained();
                let mut stage = Stage {
                    presenter,
                    sound,
                    config: &self.config,
                    lanes_drained,
                };
                self.game_over.enqueue(event, &mut stage);
            }
        }
    }

    /// Step lane queues, then the game-over queue, then prune finished visuals
    pub fn tick(&mut self, elapsed_ms: u32, presenter: &mut dyn Presenter, sound: &mut dyn Sound) {
        for queue in self.lanes.iter_mut() {
            let mut stage = Stage {
                presenter: &mut *presenter,
                sound: &mut *sound,
                config: &self.config,
                lanes_drained: false,
            };
            queue.tick(elapsed_ms, &mut stage);
        }

        let lanes_drained = self.lanes_drained();
        let mut stage = Stage {
            presenter: &mut *presenter,
            sound: &mut *sound,
            config: &self.config,
            lanes_drained,
        };
        self.game_over.tick(elapsed_ms, &mut stage);

        self.ad_hoc.retain(|&t| !presenter.is_finished(t));
    }

    /// All five queues drained and no ad hoc visual left
    ///
    /// Ad hoc visuals are pruned on [`tick`](Self::tick).
    pub fn are_all_popups_processed(&self) -> bool {
        self.lanes_drained() && self.game_over.are_all_events_processed() && self.ad_hoc.is_empty()
    }

    /// Stop every queue and cancel ad hoc visuals
    pub fn clear_popups(&mut self, presenter: &mut dyn Presenter) {
        for queue in self.lanes.iter_mut() {
            queue.stop(presenter);
        }
        self.game_over.stop(presenter);
        for t in self.ad_hoc.drain(..) {
            presenter.cancel(t);
        }
        log::debug!("popups cleared");
    }

    /// Show a popup outside any queue
    pub fn show_ad_hoc(&mut self, kind: PopupKind, presenter: &mut dyn Presenter) -> Ticket {
        let ticket = presenter.play(Animation::Popup {
            kind,
            hold_ms: self.config.popup_ms(kind.hold_ms()),
        });
        self.ad_hoc.push(ticket);
        ticket
    }

    pub fn lane_queue(&self, lane: Lane) -> &LaneEventQueue<PopupSequence> {
        &self.lanes[lane.index()]
    }

    pub fn game_over_queue(&self) -> &LaneEventQueue<GameOverSequence> {
        &self.game_over
    }

    pub fn ad_hoc_count(&self) -> usize {
        self.ad_hoc.len()
    }

    /// Popup currently shown for `lane`
    pub fn showing(&self, lane: Lane) -> Option<PopupKind> {
        self.lanes[lane.index()].current().and_then(PopupSequence::showing)
    }

    fn lanes_drained(&self) -> bool {
        self.lanes.iter().all(LaneEventQueue::are_all_events_processed)
    }

    fn start_sweeps(&mut self, deck: &Deck, presenter: &mut dyn Presenter) {
        let ms = self.config.sweep_ms;
        self.ad_hoc.push(presenter.play(Animation::BustedDeck {
            deck: deck.clone(),
            ms,
        }));
        self.ad_hoc.push(presenter.play(Animation::ClearedDeck {
            deck: deck.clone(),
            ms,
        }));
    }
}
