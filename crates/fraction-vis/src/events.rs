//! Simulation events for the presentation timeline.

use std::collections::VecDeque;

use fraction_arith::Fraction;
use serde::{Deserialize, Serialize};

use crate::phase::{AnimationPhase, LearningMode, OperationType};

/// Which of the two input fractions changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractionSlot {
    First,
    Second,
}

/// Things that happen while a problem is being walked through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimulationEvent {
    /// An input fraction was replaced
    FractionChanged { slot: FractionSlot, fraction: Fraction },

    /// A new random problem was drawn
    ProblemGenerated { fraction1: Fraction, fraction2: Fraction },

    /// The operation was switched
    OperationChanged { operation: OperationType },

    /// The learning mode was switched
    ModeChanged { mode: LearningMode },

    /// The playback speed multiplier was changed
    SpeedChanged { speed: f64 },

    /// Timed playback started
    PlaybackStarted { phase: AnimationPhase },

    /// Timed playback paused
    PlaybackPaused { phase: AnimationPhase },

    /// Playback returned to the start
    PlaybackReset,

    /// The current phase changed, by timer or by a manual step
    PhaseChanged { from: AnimationPhase, to: AnimationPhase },

    /// Timed playback reached the final phase
    Completed,
}

/// An event with its position in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub seq: u64,
    #[serde(flatten)]
    pub event: SimulationEvent,
}

/// Bounded log of recent events, oldest dropped first.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
    next_seq: u64,
}

impl EventLog {
    /// Create a log holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    /// Append an event and return its logged form.
    pub fn push(&mut self, event: SimulationEvent) -> LoggedEvent {
        let logged = LoggedEvent { seq: self.next_seq, event };
        self.next_seq += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(logged.clone());
        logged
    }

    /// Events with `seq >= since` still held in the log.
    pub fn since(&self, since: u64) -> Vec<LoggedEvent> {
        self.entries.iter().filter(|e| e.seq >= since).cloned().collect()
    }

    /// Sequence number the next event will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no events are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
