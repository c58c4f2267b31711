//! Fraction arithmetic quiz
//!
//! - `fraction`: value type and simplification
//! - `question`: difficulty-tiered question synthesis and answer checking
//! - `interruption`: pause / quiz-gate protocol used by both engines

pub mod fraction;
pub mod interruption;
pub mod question;

pub use fraction::Fraction;
pub use interruption::{GamePhase, InterruptionController, InterruptionState, SubmitOutcome};
pub use question::{
    Difficulty, Operation, Question, check_answer, format_question, generate_question,
};
