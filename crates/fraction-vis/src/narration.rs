//! Narration shown alongside each phase.

use fraction_arith::Fraction;

use crate::phase::{AnimationPhase, OperationType};

/// Canned message for a phase, before any problem-specific detail is added.
pub fn base_message(phase: AnimationPhase, operation: OperationType) -> &'static str {
    use AnimationPhase::*;
    use OperationType::*;

    match (phase, operation) {
        (Idle, _) => "Let's look at the problem.",
        (ShowFirstFraction, Multiplication) => "is the first fraction.",
        (ShowFirstFraction, Division) => "is the number being divided.",
        (ShowSecondFraction, Multiplication) => "is the number we multiply by.",
        (ShowSecondFraction, Division) => "is the number we divide by.",
        (ShowOperation, Multiplication) => "Let's multiply!",
        (ShowOperation, Division) => "Let's divide!",
        (DivisionStep1, Division) => {
            "First, split it into single parts so each part is easy to count."
        }
        (DivisionStep2, Division) => {
            "Now gather as many parts as the denominator to make one whole."
        }
        (ShowReciprocal, Division) => "Dividing is the same as multiplying by the flipped fraction!",
        (DivisionStep1 | DivisionStep2 | ShowReciprocal, Multiplication) => "",
        (MultiplyPhase, _) => "Multiply the numerators together and the denominators together.",
        (ReductionPhase, _) => "Can we simplify?",
        (ShowResult, _) => "Here is the answer!",
        (Completed, _) => "All done! Great work!",
    }
}

/// Problem values the narration can refer to.
#[derive(Debug, Clone, Copy)]
pub struct NarrationContext {
    pub fraction1: Fraction,
    pub fraction2: Fraction,
    /// `None` when the problem has no answer (dividing by zero, or too large)
    pub reduced_result: Option<Fraction>,
    pub result_gcd: u64,
    pub needs_reduction: bool,
}

/// Message for `phase`, with the fractions and answer filled in.
pub fn narrate(phase: AnimationPhase, operation: OperationType, ctx: &NarrationContext) -> String {
    let message = base_message(phase, operation);
    match phase {
        AnimationPhase::ShowFirstFraction => format!("{} {}", ctx.fraction1, message),
        AnimationPhase::ShowSecondFraction => format!("{} {}", ctx.fraction2, message),
        AnimationPhase::ReductionPhase if ctx.needs_reduction => {
            format!("We can simplify by dividing by {}!", ctx.result_gcd)
        }
        AnimationPhase::ReductionPhase => "No simplifying needed.".to_string(),
        AnimationPhase::ShowResult => match ctx.reduced_result {
            Some(answer) => format!("The answer is {}!", answer),
            None if operation == OperationType::Division && ctx.fraction2.is_zero() => {
                "We can't divide by zero.".to_string()
            }
            None => "That answer is too big to count!".to_string(),
        },
        _ => message.to_string(),
    }
}
