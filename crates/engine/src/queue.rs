//! Per-lane FIFO of game events.
//!
//! A queue holds pending events plus at most one in-flight job. The job for an
//! event is created by a [`Processor`] and polled once per tick; the next event
//! starts only after the previous job has finished, so an event never
//! overtakes one queued before it. Jobs that finish while being created (no
//! popups to show) free their slot within the same call.

use std::collections::VecDeque;

use run21_core::GameEvent;

use crate::presenter::Presenter;

/// The asynchronous handling of one event
pub trait Job {
    fn is_finished(&self) -> bool;

    /// Stop whatever the job is showing and mark it finished.
    fn cancel(&mut self, presenter: &mut dyn Presenter);
}

/// Turns queued events into jobs and drives them
pub trait Processor<J: Job> {
    fn begin(&mut self, event: &GameEvent) -> J;

    fn step(&mut self, job: &mut J, elapsed_ms: u32);
}

#[derive(Debug)]
pub struct LaneEventQueue<J> {
    label: &'static str,
    pending: VecDeque<GameEvent>,
    processing: Option<J>,
    completed: u64,
}

impl<J: Job> LaneEventQueue<J> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            pending: VecDeque::new(),
            processing: None,
            completed: 0,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Append `event`; starts it right away when the queue is idle
    pub fn enqueue<P: Processor<J>>(&mut self, event: GameEvent, processor: &mut P) {
        log::debug!("{}: enqueue {}", self.label, event.as_str());
        self.pending.push_back(event);
        self.process_next(processor);
    }

    /// Start the head event unless one is already in flight
    pub fn process_next<P: Processor<J>>(&mut self, processor: &mut P) {
        while self.processing.is_none() {
            let Some(event) = self.pending.pop_front() else {
                return;
            };
            let job = processor.begin(&event);
            if job.is_finished() {
                self.finish();
            } else {
                self.processing = Some(job);
            }
        }
    }

    /// Poll the in-flight job and move on when it is done
    pub fn tick<P: Processor<J>>(&mut self, elapsed_ms: u32, processor: &mut P) {
        if let Some(job) = self.processing.as_mut() {
            processor.step(job, elapsed_ms);
            if job.is_finished() {
                self.processing = None;
                self.finish();
            }
        }
        self.process_next(processor);
    }

    /// Cancel the in-flight job and drop everything pending
    pub fn stop(&mut self, presenter: &mut dyn Presenter) {
        if let Some(mut job) = self.processing.take() {
            job.cancel(presenter);
        }
        if !self.pending.is_empty() {
            log::debug!("{}: dropped {} pending events", self.label, self.pending.len());
            self.pending.clear();
        }
    }

    pub fn are_all_events_processed(&self) -> bool {
        self.pending.is_empty() && self.processing.is_none()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn current(&self) -> Option<&J> {
        self.processing.as_ref()
    }

    /// Events whose handling has run to completion
    pub fn completed(&self) -> u64 {
        self.completed
    }

    fn finish(&mut self) {
        self.completed += 1;
        if self.pending.is_empty() {
            log::debug!("{}: drained", self.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run21_core::{Deck, LaneOutcome, MoveScore, Pile, ScoreEvent};
    use run21_types::Lane;

    use crate::presenter::TimedPresenter;

    /// Job that takes `streak` ms to finish; lets tests pick a duration per event.
    #[derive(Debug)]
    struct Timed {
        id: u32,
        remaining: u32,
    }

    impl Job for Timed {
        fn is_finished(&self) -> bool {
            self.remaining == 0
        }

        fn cancel(&mut self, _presenter: &mut dyn Presenter) {
            self.remaining = 0;
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<u32>,
        finished: Vec<u32>,
    }

    impl Processor<Timed> for Recorder {
        fn begin(&mut self, event: &GameEvent) -> Timed {
            let GameEvent::Score(e) = event else {
                return Timed { id: 0, remaining: 0 };
            };
            let id = e.points().total;
            self.started.push(id);
            if e.streak() == 0 {
                self.finished.push(id);
            }
            Timed {
                id,
                remaining: e.streak(),
            }
        }

        fn step(&mut self, job: &mut Timed, elapsed_ms: u32) {
            job.remaining = job.remaining.saturating_sub(elapsed_ms);
            if job.remaining == 0 {
                self.finished.push(job.id);
            }
        }
    }

    fn event(id: u32, duration: u32) -> GameEvent {
        let points = MoveScore {
            total: id,
            ..MoveScore::default()
        };
        let deck = Deck::new(Pile::Lane(Lane::new(0)));
        ScoreEvent::new(Lane::new(0), deck, LaneOutcome::default(), duration, points).into()
    }

    #[test]
    fn test_fifo_even_when_later_event_is_faster() {
        let mut queue = LaneEventQueue::<Timed>::new("lane 1");
        let mut p = Recorder::default();
        queue.enqueue(event(1, 100), &mut p);
        queue.enqueue(event(2, 10), &mut p);
        queue.enqueue(event(3, 50), &mut p);

        assert_eq!(p.started, vec![1]);
        assert_eq!(queue.pending_len(), 2);

        for _ in 0..20 {
            queue.tick(16, &mut p);
        }
        assert_eq!(p.finished, vec![1, 2, 3]);
        assert_eq!(queue.completed(), 3);
        assert!(queue.are_all_events_processed());
    }

    #[test]
    fn test_instant_events_complete_in_same_call() {
        let mut queue = LaneEventQueue::<Timed>::new("lane 1");
        let mut p = Recorder::default();
        queue.enqueue(event(1, 0), &mut p);
        queue.enqueue(event(2, 0), &mut p);
        assert!(queue.are_all_events_processed());
        assert_eq!(p.finished, vec![1, 2]);
    }

    #[test]
    fn test_enqueue_while_busy_keeps_order() {
        let mut queue = LaneEventQueue::<Timed>::new("lane 1");
        let mut p = Recorder::default();
        queue.enqueue(event(1, 32), &mut p);
        queue.tick(16, &mut p);
        queue.enqueue(event(2, 0), &mut p);
        assert!(queue.is_processing());
        assert_eq!(p.finished, Vec::<u32>::new());
        queue.tick(16, &mut p);
        assert_eq!(p.finished, vec![1, 2]);
    }

    #[test]
    fn test_stop_is_idempotent_and_clears_marker() {
        let mut queue = LaneEventQueue::<Timed>::new("lane 1");
        let mut p = Recorder::default();
        let mut presenter = TimedPresenter::new();
        queue.enqueue(event(1, 100), &mut p);
        queue.enqueue(event(2, 100), &mut p);

        queue.stop(&mut presenter);
        assert!(!queue.is_processing());
        assert!(queue.are_all_events_processed());
        queue.stop(&mut presenter);
        assert!(queue.are_all_events_processed());

        queue.enqueue(event(3, 0), &mut p);
        assert_eq!(p.finished, vec![3]);
    }

    #[test]
    fn test_process_next_on_empty_is_noop() {
        let mut queue = LaneEventQueue::<Timed>::new("lane 1");
        let mut p = Recorder::default();
        queue.process_next(&mut p);
        assert!(queue.are_all_events_processed());
        assert_eq!(queue.completed(), 0);
    }
}
