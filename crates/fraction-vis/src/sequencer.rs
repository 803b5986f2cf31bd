//! Phase sequencer: timed and manual movement through the walkthrough.
//!
//! The sequencer never reads a clock. Callers pass a timestamp to [`tick`],
//! and elapsed time is measured between timestamps, so irregular tick
//! intervals do not change how long a phase lasts.
//!
//! Each play session hands out a [`TickToken`]. Pausing, resetting,
//! completing or starting a new session invalidates the token, and ticks
//! carrying a stale token are ignored.
//!
//! [`tick`]: PhaseSequencer::tick

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::phase::{AnimationPhase, OperationType};

/// Authorizes ticks for a single play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

/// A move from one phase to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: AnimationPhase,
    pub to: AnimationPhase,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not playing, terminal phase, or a stale token
    Ignored,
    /// Still inside the current phase
    Progressed(f64),
    /// Moved to the next phase
    Advanced(PhaseChange),
    /// Moved into the terminal phase; playback has stopped
    Completed(PhaseChange),
}

/// Progress through the current operation's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationProgress {
    pub current_phase: AnimationPhase,
    /// Fraction of the current phase elapsed (0.0 - 1.0)
    pub phase_progress: f64,
    /// Fraction of the whole sequence elapsed (0.0 - 1.0)
    pub total_progress: f64,
}

/// Steps through the phases of one operation.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    operation: OperationType,
    phase: AnimationPhase,
    phase_progress: f64,
    playing: bool,
    phase_started: Option<Instant>,
    session: u64,
}

impl PhaseSequencer {
    /// Create a stopped sequencer at `Idle`.
    pub fn new(operation: OperationType) -> Self {
        Self {
            operation,
            phase: AnimationPhase::Idle,
            phase_progress: 0.0,
            playing: false,
            phase_started: None,
            session: 0,
        }
    }

    /// Get the current phase.
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Get the operation whose sequence is being walked.
    pub fn operation(&self) -> OperationType {
        self.operation
    }

    /// True while timed playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Fraction of the current phase elapsed, as of the last tick.
    pub fn phase_progress(&self) -> f64 {
        self.phase_progress
    }

    /// Position of the current phase in the sequence.
    pub fn index(&self) -> usize {
        self.operation.index_of(self.phase).unwrap_or(0)
    }

    /// Number of phases in the sequence.
    pub fn phase_count(&self) -> usize {
        self.operation.phases().len()
    }

    /// Progress summary for display.
    pub fn progress(&self) -> AnimationProgress {
        let last = (self.phase_count() - 1) as f64;
        let total = (self.index() as f64 + self.phase_progress) / last;
        AnimationProgress {
            current_phase: self.phase,
            phase_progress: self.phase_progress,
            total_progress: total.min(1.0),
        }
    }

    /// Start timed playback, rewinding first if the sequence has completed.
    ///
    /// Timing of the current phase restarts from zero.
    pub fn play(&mut self) -> TickToken {
        if self.phase.is_terminal() {
            self.enter(AnimationPhase::Idle);
        }
        self.playing = true;
        self.phase_started = None;
        self.new_session()
    }

    /// Stop timed playback where it is. Progress is kept.
    pub fn pause(&mut self) {
        self.playing = false;
        self.new_session();
    }

    /// Stop playback and return to `Idle`.
    pub fn reset(&mut self) {
        self.playing = false;
        self.enter(AnimationPhase::Idle);
        self.new_session();
    }

    /// Switch to another operation's sequence.
    ///
    /// Phase positions do not carry across sequences, so a change of operation
    /// resets to `Idle`.
    pub fn set_operation(&mut self, operation: OperationType) {
        if self.operation != operation {
            self.operation = operation;
            self.reset();
        }
    }

    /// Jump straight to `phase`.
    pub fn set_phase(&mut self, phase: AnimationPhase) -> Result<PhaseChange> {
        if self.operation.index_of(phase).is_none() {
            return Err(Error::PhaseNotInSequence {
                phase,
                operation: self.operation,
            });
        }
        let from = self.phase;
        self.enter(phase);
        Ok(PhaseChange { from, to: phase })
    }

    /// Step forward one phase. Only while paused; no-op at the end.
    pub fn step_forward(&mut self) -> Option<PhaseChange> {
        if self.playing {
            return None;
        }
        self.advance()
    }

    /// Step back one phase. Only while paused; no-op at the start.
    pub fn step_back(&mut self) -> Option<PhaseChange> {
        if self.playing {
            return None;
        }
        let index = self.index();
        if index == 0 {
            return None;
        }
        let from = self.phase;
        let to = self.operation.phases()[index - 1];
        self.enter(to);
        Some(PhaseChange { from, to })
    }

    /// Advance the phase clock to `now`.
    ///
    /// The first tick of a phase anchors its clock. A phase ends once
    /// `elapsed >= duration / speed`; `speed` is read on every tick, so changing
    /// it mid-phase changes the time remaining.
    pub fn tick(&mut self, token: TickToken, now: Instant, speed: f64) -> TickOutcome {
        if !self.playing || token.0 != self.session {
            return TickOutcome::Ignored;
        }
        let nominal = match self.phase.duration() {
            Some(nominal) => nominal,
            None => return TickOutcome::Ignored,
        };

        let started = *self.phase_started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        let scaled = nominal.as_secs_f64() / speed;
        let progress = if scaled > 0.0 { (elapsed / scaled).min(1.0) } else { 1.0 };
        self.phase_progress = progress;

        if progress < 1.0 {
            return TickOutcome::Progressed(progress);
        }

        let change = match self.advance() {
            Some(change) => change,
            None => return TickOutcome::Ignored,
        };
        self.phase_started = Some(now);

        if change.to.is_terminal() {
            self.playing = false;
            self.new_session();
            TickOutcome::Completed(change)
        } else {
            TickOutcome::Advanced(change)
        }
    }

    fn advance(&mut self) -> Option<PhaseChange> {
        let phases = self.operation.phases();
        let index = self.index();
        if index + 1 >= phases.len() {
            return None;
        }
        let from = self.phase;
        let to = phases[index + 1];
        self.enter(to);
        Some(PhaseChange { from, to })
    }

    fn enter(&mut self, phase: AnimationPhase) {
        self.phase = phase;
        self.phase_progress = 0.0;
        self.phase_started = None;
    }

    fn new_session(&mut self) -> TickToken {
        self.session = self.session.wrapping_add(1);
        TickToken(self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_idle_and_stopped() {
        let seq = PhaseSequencer::new(OperationType::Multiplication);
        assert_eq!(seq.phase(), AnimationPhase::Idle);
        assert!(!seq.is_playing());
        assert_eq!(seq.progress().total_progress, 0.0);
    }

    #[test]
    fn multiplication_steps_to_completed() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        for _ in 0..7 {
            assert!(seq.step_forward().is_some());
        }
        assert_eq!(seq.phase(), AnimationPhase::Completed);
        assert_eq!(seq.step_forward(), None);
        assert_eq!(seq.phase(), AnimationPhase::Completed);
        assert_eq!(seq.progress().total_progress, 1.0);
    }

    #[test]
    fn division_steps_to_completed() {
        let mut seq = PhaseSequencer::new(OperationType::Division);
        for _ in 0..10 {
            assert!(seq.step_forward().is_some());
        }
        assert_eq!(seq.phase(), AnimationPhase::Completed);
        assert_eq!(seq.step_forward(), None);
    }

    #[test]
    fn step_back_stops_at_start() {
        let mut seq = PhaseSequencer::new(OperationType::Division);
        assert_eq!(seq.step_back(), None);

        seq.step_forward();
        seq.step_forward();
        let change = seq.step_back().unwrap();
        assert_eq!(change.from, AnimationPhase::ShowSecondFraction);
        assert_eq!(change.to, AnimationPhase::ShowFirstFraction);
    }

    #[test]
    fn steps_ignored_while_playing() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        seq.step_forward();
        seq.play();
        assert_eq!(seq.step_forward(), None);
        assert_eq!(seq.step_back(), None);
        assert_eq!(seq.phase(), AnimationPhase::ShowFirstFraction);
    }

    #[test]
    fn timed_advance() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        let token = seq.play();
        let t0 = Instant::now();

        assert_eq!(seq.tick(token, t0, 1.0), TickOutcome::Progressed(0.0));
        assert_eq!(seq.tick(token, t0 + ms(250), 1.0), TickOutcome::Progressed(0.5));

        let outcome = seq.tick(token, t0 + ms(500), 1.0);
        assert_eq!(
            outcome,
            TickOutcome::Advanced(PhaseChange {
                from: AnimationPhase::Idle,
                to: AnimationPhase::ShowFirstFraction,
            })
        );
        assert_eq!(seq.phase_progress(), 0.0);

        // Clock re-anchors at the transition
        assert_eq!(seq.tick(token, t0 + ms(1000), 1.0), TickOutcome::Progressed(0.5));
    }

    #[test]
    fn speed_scales_duration() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        let token = seq.play();
        let t0 = Instant::now();
        seq.tick(token, t0, 2.0);
        assert!(matches!(seq.tick(token, t0 + ms(250), 2.0), TickOutcome::Advanced(_)));
    }

    #[test]
    fn speed_change_applies_to_running_phase() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        seq.set_phase(AnimationPhase::MultiplyPhase).unwrap();
        let token = seq.play();
        let t0 = Instant::now();

        seq.tick(token, t0, 1.0);
        assert_eq!(seq.tick(token, t0 + ms(500), 1.0), TickOutcome::Progressed(0.25));

        // 500ms of a 2000ms phase elapsed; at 2x the phase now lasts 1000ms
        assert!(matches!(seq.tick(token, t0 + ms(999), 2.0), TickOutcome::Progressed(_)));
        assert_eq!(
            seq.tick(token, t0 + ms(1000), 2.0),
            TickOutcome::Advanced(PhaseChange {
                from: AnimationPhase::MultiplyPhase,
                to: AnimationPhase::ReductionPhase,
            })
        );
    }

    #[test]
    fn irregular_ticks_do_not_change_timing() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        let token = seq.play();
        let t0 = Instant::now();
        seq.tick(token, t0, 1.0);
        for offset in [3, 40, 41, 200, 499] {
            assert!(matches!(seq.tick(token, t0 + ms(offset), 1.0), TickOutcome::Progressed(_)));
        }
        assert!(matches!(seq.tick(token, t0 + ms(500), 1.0), TickOutcome::Advanced(_)));
    }

    #[test]
    fn completes_and_stops() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        seq.set_phase(AnimationPhase::ShowResult).unwrap();
        let token = seq.play();
        let t0 = Instant::now();
        seq.tick(token, t0, 1.0);

        let outcome = seq.tick(token, t0 + ms(1500), 1.0);
        assert_eq!(
            outcome,
            TickOutcome::Completed(PhaseChange {
                from: AnimationPhase::ShowResult,
                to: AnimationPhase::Completed,
            })
        );
        assert!(!seq.is_playing());
        assert_eq!(seq.tick(token, t0 + ms(5000), 1.0), TickOutcome::Ignored);
        assert_eq!(seq.phase(), AnimationPhase::Completed);
    }

    #[test]
    fn play_after_completion_rewinds() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        seq.set_phase(AnimationPhase::Completed).unwrap();
        seq.play();
        assert_eq!(seq.phase(), AnimationPhase::Idle);
        assert!(seq.is_playing());
    }

    #[test]
    fn reset_invalidates_pending_ticks() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        let token = seq.play();
        let t0 = Instant::now();
        seq.tick(token, t0, 1.0);
        seq.tick(token, t0 + ms(500), 1.0);
        assert_eq!(seq.phase(), AnimationPhase::ShowFirstFraction);

        seq.reset();
        assert_eq!(seq.phase(), AnimationPhase::Idle);
        assert!(!seq.is_playing());
        assert_eq!(seq.phase_progress(), 0.0);

        // A tick scheduled before the reset must not land
        assert_eq!(seq.tick(token, t0 + ms(10_000), 1.0), TickOutcome::Ignored);
        assert_eq!(seq.phase(), AnimationPhase::Idle);

        // Nor may it land in a later session
        let fresh = seq.play();
        assert_eq!(seq.tick(token, t0 + ms(20_000), 1.0), TickOutcome::Ignored);
        assert_eq!(seq.tick(fresh, t0 + ms(20_000), 1.0), TickOutcome::Progressed(0.0));
    }

    #[test]
    fn pause_keeps_progress_and_restart_times_from_zero() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        let token = seq.play();
        let t0 = Instant::now();
        seq.tick(token, t0, 1.0);
        seq.tick(token, t0 + ms(250), 1.0);

        seq.pause();
        assert!(!seq.is_playing());
        assert_eq!(seq.phase_progress(), 0.5);
        assert_eq!(seq.tick(token, t0 + ms(400), 1.0), TickOutcome::Ignored);

        let token = seq.play();
        let t1 = t0 + ms(1000);
        assert_eq!(seq.tick(token, t1, 1.0), TickOutcome::Progressed(0.0));
        assert_eq!(seq.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn operation_change_resets() {
        let mut seq = PhaseSequencer::new(OperationType::Division);
        seq.set_phase(AnimationPhase::DivisionStep2).unwrap();
        seq.set_operation(OperationType::Multiplication);
        assert_eq!(seq.phase(), AnimationPhase::Idle);
        assert_eq!(seq.phase_count(), 8);

        seq.step_forward();
        seq.set_operation(OperationType::Multiplication);
        assert_eq!(seq.phase(), AnimationPhase::ShowFirstFraction);
    }

    #[test]
    fn set_phase_rejects_foreign_phase() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        assert!(matches!(
            seq.set_phase(AnimationPhase::ShowReciprocal),
            Err(Error::PhaseNotInSequence { .. })
        ));
        assert_eq!(seq.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn total_progress_counts_phase_fraction() {
        let mut seq = PhaseSequencer::new(OperationType::Multiplication);
        let token = seq.play();
        let t0 = Instant::now();
        seq.tick(token, t0, 1.0);
        seq.tick(token, t0 + ms(250), 1.0);
        let progress = seq.progress();
        assert_eq!(progress.current_phase, AnimationPhase::Idle);
        assert!((progress.total_progress - 0.5 / 7.0).abs() < 1e-9);
    }
}
