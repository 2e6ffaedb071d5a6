//! Counted join over the three legs of an animated undo.

/// One independently timed part of an animated undo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// Ghost cards dealt back onto a lane the move had cleared.
    ClearedLaneRestored,
    /// Active card flown back onto the draw pile.
    ActiveToDrawDone,
    /// Played card flown from its lane back to the active slot.
    LastPlayedToActiveDone,
}

impl Leg {
    pub const ALL: [Leg; 3] = [
        Leg::ClearedLaneRestored,
        Leg::ActiveToDrawDone,
        Leg::LastPlayedToActiveDone,
    ];

    fn bit(self) -> u8 {
        match self {
            Leg::ClearedLaneRestored => 1 << 0,
            Leg::ActiveToDrawDone => 1 << 1,
            Leg::LastPlayedToActiveDone => 1 << 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Leg::ClearedLaneRestored => "cleared_lane_restored",
            Leg::ActiveToDrawDone => "active_to_draw_done",
            Leg::LastPlayedToActiveDone => "last_played_to_active_done",
        }
    }
}

/// Opens once every expected leg has signalled
///
/// Signalling a leg more than once counts once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latch {
    signalled: u8,
    expected: u32,
}

impl Latch {
    /// A latch waiting on all three legs
    pub fn new() -> Self {
        Self {
            signalled: 0,
            expected: Leg::ALL.len() as u32,
        }
    }

    /// Record `leg`; returns false if it had already signalled
    pub fn signal(&mut self, leg: Leg) -> bool {
        if self.is_signalled(leg) {
            return false;
        }
        self.signalled |= leg.bit();
        log::debug!("undo leg {} signalled ({}/{})", leg.as_str(), self.count(), self.expected);
        true
    }

    pub fn is_signalled(&self, leg: Leg) -> bool {
        self.signalled & leg.bit() != 0
    }

    pub fn count(&self) -> u32 {
        self.signalled.count_ones()
    }

    pub fn is_open(&self) -> bool {
        self.count() == self.expected
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_only_after_all_legs() {
        let mut latch = Latch::new();
        assert!(!latch.is_open());
        latch.signal(Leg::ActiveToDrawDone);
        latch.signal(Leg::ClearedLaneRestored);
        assert_eq!(latch.count(), 2);
        assert!(!latch.is_open());
        latch.signal(Leg::LastPlayedToActiveDone);
        assert!(latch.is_open());
    }

    #[test]
    fn test_double_signal_counts_once() {
        let mut latch = Latch::new();
        assert!(latch.signal(Leg::ActiveToDrawDone));
        assert!(!latch.signal(Leg::ActiveToDrawDone));
        assert!(!latch.signal(Leg::ActiveToDrawDone));
        latch.signal(Leg::LastPlayedToActiveDone);
        assert_eq!(latch.count(), 2);
        assert!(!latch.is_open());
    }
}
