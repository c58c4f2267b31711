//! Error types
//!
//! Only quiz submissions and settings loading can fail. Illegal moves are
//! reported as `false` from the movement ops, and terminal conditions are
//! phases, not errors.

use thiserror::Error;

/// Rejected quiz submission. State is never mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("please enter valid numbers: {0}")]
    InvalidInput(String),

    #[error("please enter valid numbers (denominator cannot be 0)")]
    ZeroDenominator,

    #[error("no question is waiting for an answer")]
    NoActiveQuestion,
}

/// Failure to load or validate [`crate::Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}
