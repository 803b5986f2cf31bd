//! Simulation controller: owns the problem, the sequencer and the event log.

use std::ops::RangeInclusive;
use std::time::Instant;

use fraction_arith::{
    divide_fractions, fraction_gcd, multiply_fractions, random_fraction, reciprocal,
    reduce_fraction, Fraction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::area::{AreaModel, ReductionGroups};
use crate::error::{Error, Result};
use crate::events::{EventLog, FractionSlot, LoggedEvent, SimulationEvent};
use crate::narration::{narrate, NarrationContext};
use crate::phase::{
    AnimationPhase, DivisionStep, LearningMode, NarrationTone, OperationType, ReductionStep,
};
use crate::sequencer::{AnimationProgress, PhaseChange, PhaseSequencer, TickOutcome, TickToken};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub initial_fraction1: Fraction,
    pub initial_fraction2: Fraction,
    pub initial_operation: OperationType,
    pub initial_mode: LearningMode,
    pub initial_speed: f64,
    /// Values the presentation layer lets users enter
    pub input_range: RangeInclusive<u64>,
    /// Values drawn for random problems
    pub random_range: RangeInclusive<u64>,
    /// Slowest and fastest playback the presentation layer offers
    pub speed_range: RangeInclusive<f64>,
    /// Granularity of the speed control
    pub speed_step: f64,
    /// Events kept for late subscribers
    pub event_capacity: usize,
    /// Seed for random problems; entropy when unset
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_fraction1: Fraction { numerator: 2, denominator: 3 },
            initial_fraction2: Fraction { numerator: 3, denominator: 4 },
            initial_operation: OperationType::Multiplication,
            initial_mode: LearningMode::Watch,
            initial_speed: 1.0,
            input_range: 1..=10,
            random_range: 1..=6,
            speed_range: 0.5..=2.0,
            speed_step: 0.25,
            event_capacity: 256,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Clamp raw numerator/denominator input into the input range.
    pub fn clamp_fraction(&self, numerator: u64, denominator: u64) -> Fraction {
        let (min, max) = (*self.input_range.start(), *self.input_range.end());
        Fraction {
            numerator: numerator.max(min).min(max),
            denominator: denominator.max(min).min(max).max(1),
        }
    }

    /// Snap a raw speed to the step grid inside the speed range.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        let (min, max) = (*self.speed_range.start(), *self.speed_range.end());
        if !speed.is_finite() {
            return min;
        }
        let snapped = if self.speed_step > 0.0 {
            min + ((speed - min) / self.speed_step).round() * self.speed_step
        } else {
            speed
        };
        snapped.max(min).min(max)
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub fraction1: Fraction,
    pub fraction2: Fraction,
    pub operation: OperationType,
    pub mode: LearningMode,
    pub phase: AnimationPhase,
    pub is_playing: bool,
    pub speed: f64,
    pub narration: String,
}

/// The answer to the current problem. Always recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemOutcome {
    /// Unreduced product or quotient
    pub result: Fraction,
    pub reduced_result: Fraction,
    pub result_gcd: u64,
    pub needs_reduction: bool,
}

impl ProblemOutcome {
    /// Work out `fraction1 (op) fraction2`.
    pub fn evaluate(
        fraction1: Fraction,
        fraction2: Fraction,
        operation: OperationType,
    ) -> Result<Self> {
        let result = match operation {
            OperationType::Multiplication => multiply_fractions(fraction1, fraction2)?,
            OperationType::Division => divide_fractions(fraction1, fraction2)?,
        };
        let result_gcd = fraction_gcd(result);
        Ok(Self {
            result,
            reduced_result: reduce_fraction(result),
            result_gcd,
            needs_reduction: result_gcd > 1,
        })
    }
}

/// Full output contract: state, derived answer and display models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub state: SimulationState,
    /// Absent when the problem has no answer
    pub outcome: Option<ProblemOutcome>,
    pub progress: AnimationProgress,
    /// Only for division
    pub division_step: Option<DivisionStep>,
    pub reduction_step: ReductionStep,
    /// Present while the area model is on screen
    pub area: Option<AreaModel>,
    /// Present while a reducible product is being simplified
    pub reduction: Option<ReductionGroups>,
    pub narration_tone: NarrationTone,
    /// Sequence number of the next event
    pub next_event_seq: u64,
}

/// Owns one fraction problem and its walkthrough.
pub struct Simulator {
    config: SimulatorConfig,
    fraction1: Fraction,
    fraction2: Fraction,
    operation: OperationType,
    mode: LearningMode,
    speed: f64,
    sequencer: PhaseSequencer,
    rng: StdRng,
    events: EventLog,
    notifier: broadcast::Sender<LoggedEvent>,
}

impl Simulator {
    /// Create a simulator from its configuration.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        validate_speed(config.initial_speed)?;
        let fraction1 = Fraction::new(
            config.initial_fraction1.numerator,
            config.initial_fraction1.denominator,
        )?;
        let fraction2 = Fraction::new(
            config.initial_fraction2.numerator,
            config.initial_fraction2.denominator,
        )?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (notifier, _) = broadcast::channel(config.event_capacity.max(1));

        Ok(Self {
            fraction1,
            fraction2,
            operation: config.initial_operation,
            mode: config.initial_mode,
            speed: config.initial_speed,
            sequencer: PhaseSequencer::new(config.initial_operation),
            rng,
            events: EventLog::new(config.event_capacity),
            notifier,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Snapshot of the simulation state, narration included.
    pub fn state(&self) -> SimulationState {
        SimulationState {
            fraction1: self.fraction1,
            fraction2: self.fraction2,
            operation: self.operation,
            mode: self.mode,
            phase: self.sequencer.phase(),
            is_playing: self.sequencer.is_playing(),
            speed: self.speed,
            narration: self.narration(),
        }
    }

    /// The answer to the current problem.
    pub fn outcome(&self) -> Result<ProblemOutcome> {
        ProblemOutcome::evaluate(self.fraction1, self.fraction2, self.operation)
    }

    /// Get the current phase.
    pub fn phase(&self) -> AnimationPhase {
        self.sequencer.phase()
    }

    /// True while timed playback is running.
    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// Get the playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Progress through the sequence.
    pub fn progress(&self) -> AnimationProgress {
        self.sequencer.progress()
    }

    /// Narration for the current phase.
    pub fn narration(&self) -> String {
        let outcome = self.outcome().ok();
        let ctx = NarrationContext {
            fraction1: self.fraction1,
            fraction2: self.fraction2,
            reduced_result: outcome.map(|o| o.reduced_result),
            result_gcd: outcome.map_or(0, |o| o.result_gcd),
            needs_reduction: outcome.is_some_and(|o| o.needs_reduction),
        };
        narrate(self.sequencer.phase(), self.operation, &ctx)
    }

    /// Everything the presentation layer reads on a frame.
    pub fn view(&self) -> ViewState {
        let phase = self.sequencer.phase();
        let outcome = self.outcome().ok();
        let needs_reduction = outcome.is_some_and(|o| o.needs_reduction);

        let limit = self.display_limit();
        let area = if phase.shows_area_model() {
            self.area_operands()
                .and_then(|(a, b)| AreaModel::bounded(a, b, limit))
        } else {
            None
        };
        let reduction = match outcome {
            Some(o) if phase == AnimationPhase::ReductionPhase && o.needs_reduction => {
                ReductionGroups::bounded(o.result, o.result_gcd, limit)
            }
            _ => None,
        };
        let division_step = match self.operation {
            OperationType::Division => Some(DivisionStep::from(phase)),
            OperationType::Multiplication => None,
        };

        ViewState {
            state: self.state(),
            outcome,
            progress: self.sequencer.progress(),
            division_step,
            reduction_step: ReductionStep::for_phase(phase, needs_reduction),
            area,
            reduction,
            narration_tone: NarrationTone::from(phase),
            next_event_seq: self.events.next_seq(),
        }
    }

    /// Largest grid or block row drawn: the square of the biggest enterable value.
    fn display_limit(&self) -> u64 {
        let end = (*self.config.input_range.end()).max(1);
        end.saturating_mul(end)
    }

    /// Fractions drawn in the area model: division multiplies by the reciprocal.
    fn area_operands(&self) -> Option<(Fraction, Fraction)> {
        match self.operation {
            OperationType::Multiplication => Some((self.fraction1, self.fraction2)),
            OperationType::Division => reciprocal(self.fraction2).ok().map(|r| (self.fraction1, r)),
        }
    }

    /// Replace the first fraction. The phase is left alone.
    pub fn set_fraction1(&mut self, fraction: Fraction) -> Result<()> {
        self.set_fraction(FractionSlot::First, fraction)
    }

    /// Replace the second fraction. The phase is left alone.
    pub fn set_fraction2(&mut self, fraction: Fraction) -> Result<()> {
        self.set_fraction(FractionSlot::Second, fraction)
    }

    fn set_fraction(&mut self, slot: FractionSlot, fraction: Fraction) -> Result<()> {
        let fraction = Fraction::new(fraction.numerator, fraction.denominator)?;
        match slot {
            FractionSlot::First => self.fraction1 = fraction,
            FractionSlot::Second => self.fraction2 = fraction,
        }
        self.record(SimulationEvent::FractionChanged { slot, fraction });
        Ok(())
    }

    /// Switch operation. The sequencer returns to `Idle` on a change.
    pub fn set_operation(&mut self, operation: OperationType) {
        if operation == self.operation {
            return;
        }
        self.operation = operation;
        self.sequencer.set_operation(operation);
        self.record(SimulationEvent::OperationChanged { operation });
    }

    /// Switch learning mode.
    pub fn set_mode(&mut self, mode: LearningMode) {
        self.mode = mode;
        self.record(SimulationEvent::ModeChanged { mode });
    }

    /// Change the speed multiplier. Takes effect on the running phase.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        validate_speed(speed)?;
        self.speed = speed;
        self.record(SimulationEvent::SpeedChanged { speed });
        Ok(())
    }

    /// Draw a new random problem and rewind.
    pub fn generate_random_problem(&mut self) -> Result<()> {
        let range = self.config.random_range.clone();
        let fraction1 = random_fraction(&mut self.rng, range.clone())?;
        let fraction2 = random_fraction(&mut self.rng, range)?;
        self.fraction1 = fraction1;
        self.fraction2 = fraction2;
        self.record(SimulationEvent::ProblemGenerated { fraction1, fraction2 });
        self.reset();
        Ok(())
    }

    /// Start timed playback. Returns the token the tick source must present.
    pub fn play(&mut self) -> TickToken {
        let token = self.sequencer.play();
        self.record(SimulationEvent::PlaybackStarted { phase: self.sequencer.phase() });
        token
    }

    /// Pause timed playback.
    pub fn pause(&mut self) {
        self.sequencer.pause();
        self.record(SimulationEvent::PlaybackPaused { phase: self.sequencer.phase() });
    }

    /// Stop and rewind to `Idle`.
    pub fn reset(&mut self) {
        self.sequencer.reset();
        self.record(SimulationEvent::PlaybackReset);
    }

    /// Step forward one phase while paused.
    pub fn step_forward(&mut self) -> Option<PhaseChange> {
        let change = self.sequencer.step_forward()?;
        self.record_change(change);
        Some(change)
    }

    /// Step back one phase while paused.
    pub fn step_back(&mut self) -> Option<PhaseChange> {
        let change = self.sequencer.step_back()?;
        self.record_change(change);
        Some(change)
    }

    /// Jump to a phase of the current operation.
    pub fn set_phase(&mut self, phase: AnimationPhase) -> Result<PhaseChange> {
        let change = self.sequencer.set_phase(phase)?;
        self.record_change(change);
        Ok(change)
    }

    /// Advance the phase clock to `now` at the current speed.
    pub fn tick(&mut self, token: TickToken, now: Instant) -> TickOutcome {
        let outcome = self.sequencer.tick(token, now, self.speed);
        match outcome {
            TickOutcome::Advanced(change) => self.record_change(change),
            TickOutcome::Completed(change) => {
                self.record_change(change);
                self.record(SimulationEvent::Completed);
                tracing::info!(
                    operation = ?self.operation,
                    fraction1 = %self.fraction1,
                    fraction2 = %self.fraction2,
                    "Walkthrough completed"
                );
            }
            TickOutcome::Progressed(_) | TickOutcome::Ignored => {}
        }
        outcome
    }

    /// Logged events with `seq >= since`.
    pub fn events_since(&self, since: u64) -> Vec<LoggedEvent> {
        self.events.since(since)
    }

    /// Receive events as they are logged.
    pub fn subscribe(&self) -> broadcast::Receiver<LoggedEvent> {
        self.notifier.subscribe()
    }

    fn record_change(&mut self, change: PhaseChange) {
        if change.from != change.to {
            self.record(SimulationEvent::PhaseChanged { from: change.from, to: change.to });
        }
    }

    fn record(&mut self, event: SimulationEvent) {
        tracing::debug!(?event, "Simulation event");
        let logged = self.events.push(event);
        // No subscribers is fine.
        let _ = self.notifier.send(logged);
    }
}

fn validate_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}
