//! Operations, learning modes and the ordered animation phases.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The arithmetic being taught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// `a × b`
    #[default]
    Multiplication,
    /// `a ÷ b`, shown as `a × 1/b`
    Division,
}

impl OperationType {
    /// The ordered phases walked through for this operation.
    pub fn phases(&self) -> &'static [AnimationPhase] {
        match self {
            OperationType::Multiplication => MULTIPLICATION_PHASES,
            OperationType::Division => DIVISION_PHASES,
        }
    }

    /// Position of `phase` in this operation's sequence.
    pub fn index_of(&self, phase: AnimationPhase) -> Option<usize> {
        self.phases().iter().position(|&p| p == phase)
    }

    /// Operator symbol.
    pub fn symbol(&self) -> char {
        match self {
            OperationType::Multiplication => '×',
            OperationType::Division => '÷',
        }
    }
}

/// Which input widgets the presentation layer shows. No effect on the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningMode {
    #[default]
    Watch,
    Interact,
    Challenge,
}

/// A named step of the guided walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationPhase {
    #[default]
    Idle,
    ShowFirstFraction,
    ShowSecondFraction,
    ShowOperation,
    /// Divide the whole into unit parts of the divisor
    DivisionStep1,
    /// Gather unit parts until they make one whole
    DivisionStep2,
    /// Flip the divisor into its reciprocal
    ShowReciprocal,
    /// Area-model overlap of the two fractions
    MultiplyPhase,
    /// GCD grouping of the product
    ReductionPhase,
    ShowResult,
    Completed,
}

const MULTIPLICATION_PHASES: &[AnimationPhase] = &[
    AnimationPhase::Idle,
    AnimationPhase::ShowFirstFraction,
    AnimationPhase::ShowSecondFraction,
    AnimationPhase::ShowOperation,
    AnimationPhase::MultiplyPhase,
    AnimationPhase::ReductionPhase,
    AnimationPhase::ShowResult,
    AnimationPhase::Completed,
];

const DIVISION_PHASES: &[AnimationPhase] = &[
    AnimationPhase::Idle,
    AnimationPhase::ShowFirstFraction,
    AnimationPhase::ShowSecondFraction,
    AnimationPhase::ShowOperation,
    AnimationPhase::DivisionStep1,
    AnimationPhase::DivisionStep2,
    AnimationPhase::ShowReciprocal,
    AnimationPhase::MultiplyPhase,
    AnimationPhase::ReductionPhase,
    AnimationPhase::ShowResult,
    AnimationPhase::Completed,
];

impl AnimationPhase {
    /// Nominal duration at 1x speed. `None` for the terminal phase, which never
    /// auto-advances.
    pub const fn duration(&self) -> Option<Duration> {
        let ms = match self {
            AnimationPhase::Idle => 500,
            AnimationPhase::ShowFirstFraction => 1000,
            AnimationPhase::ShowSecondFraction => 1000,
            AnimationPhase::ShowOperation => 800,
            AnimationPhase::DivisionStep1 => 1500,
            AnimationPhase::DivisionStep2 => 1500,
            AnimationPhase::ShowReciprocal => 1200,
            AnimationPhase::MultiplyPhase => 2000,
            AnimationPhase::ReductionPhase => 2000,
            AnimationPhase::ShowResult => 1500,
            AnimationPhase::Completed => return None,
        };
        Some(Duration::from_millis(ms))
    }

    /// True for the terminal phase.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, AnimationPhase::Completed)
    }

    /// True where the area model is on screen.
    pub const fn shows_area_model(&self) -> bool {
        matches!(
            self,
            AnimationPhase::MultiplyPhase
                | AnimationPhase::ReductionPhase
                | AnimationPhase::ShowResult
                | AnimationPhase::Completed
        )
    }
}

/// Sub-step of the division-to-multiplication card animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DivisionStep {
    Initial,
    Step1,
    Step2,
    Reciprocal,
    Complete,
}

impl From<AnimationPhase> for DivisionStep {
    fn from(phase: AnimationPhase) -> Self {
        match phase {
            AnimationPhase::DivisionStep1 => DivisionStep::Step1,
            AnimationPhase::DivisionStep2 => DivisionStep::Step2,
            AnimationPhase::ShowReciprocal => DivisionStep::Reciprocal,
            AnimationPhase::MultiplyPhase
            | AnimationPhase::ReductionPhase
            | AnimationPhase::ShowResult
            | AnimationPhase::Completed => DivisionStep::Complete,
            _ => DivisionStep::Initial,
        }
    }
}

/// Sub-step of the reduction block animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReductionStep {
    Initial,
    Highlighting,
    Complete,
}

impl ReductionStep {
    /// Reduction only animates inside the reduction phase; an irreducible
    /// product skips straight to complete.
    pub fn for_phase(phase: AnimationPhase, needs_reduction: bool) -> Self {
        match (phase, needs_reduction) {
            (AnimationPhase::ReductionPhase, true) => ReductionStep::Highlighting,
            (AnimationPhase::ReductionPhase, false) => ReductionStep::Complete,
            _ => ReductionStep::Initial,
        }
    }
}

/// How the narration box should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationTone {
    Info,
    Hint,
    Success,
}

impl From<AnimationPhase> for NarrationTone {
    fn from(phase: AnimationPhase) -> Self {
        match phase {
            AnimationPhase::ShowResult | AnimationPhase::Completed => NarrationTone::Success,
            AnimationPhase::ShowReciprocal => NarrationTone::Hint,
            _ => NarrationTone::Info,
        }
    }
}
