//! Pause / quiz-gate protocol shared by both engines
//!
//! The owning engine checks [`InterruptionController::is_suspended`] at the top
//! of every tick. While a quiz is up the engine is paused, and the controller
//! is the only thing that mutates interruption state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fraction::Fraction;
use super::question::{Question, check_answer, format_question, generate_question};
use crate::error::QuizError;

/// Externally visible engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the simulation
    Running,
    /// Manually paused
    Paused,
    /// Waiting for a quiz answer
    QuizGated,
    /// Board overflow or no lives left; only restart leaves this
    GameOver,
}

/// Result of a well-formed quiz submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Answer was correct
    pub accepted: bool,
    /// Attempts left after this submission
    pub attempts_remaining: u8,
    /// Attempts exhausted; the owning engine restarts
    pub game_over: bool,
}

/// Interruption state owned by the active engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptionState {
    pub paused: bool,
    /// Always implies `paused`
    pub quiz_active: bool,
    pub attempts_remaining: u8,
    pub active_question: Option<Question>,
}

#[derive(Debug, Clone)]
pub struct InterruptionController {
    state: InterruptionState,
    max_attempts: u8,
}

impl InterruptionController {
    pub fn new(max_attempts: u8) -> Self {
        Self {
            state: InterruptionState {
                paused: false,
                quiz_active: false,
                attempts_remaining: max_attempts,
                active_question: None,
            },
            max_attempts,
        }
    }

    pub fn state(&self) -> &InterruptionState {
        &self.state
    }

    /// No tick may advance while this is true
    pub fn is_suspended(&self) -> bool {
        self.state.paused
    }

    pub fn is_quiz_active(&self) -> bool {
        self.state.quiz_active
    }

    pub fn attempts_remaining(&self) -> u8 {
        self.state.attempts_remaining
    }

    pub fn question(&self) -> Option<&Question> {
        self.state.active_question.as_ref()
    }

    pub fn question_text(&self) -> Option<String> {
        self.question().map(format_question)
    }

    /// Map interruption state plus the engine's terminal flag to a phase
    pub fn phase(&self, game_over: bool) -> GamePhase {
        if game_over {
            GamePhase::GameOver
        } else if self.state.quiz_active {
            GamePhase::QuizGated
        } else if self.state.paused {
            GamePhase::Paused
        } else {
            GamePhase::Running
        }
    }

    /// Manual pause toggle. Ignored while a quiz is up. Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.state.quiz_active {
            self.state.paused = !self.state.paused;
        }
        self.state.paused
    }

    /// Freeze the engine and surface a question for `level`
    pub fn trigger<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R) -> &Question {
        let question = generate_question(level, rng);
        log::info!(
            "Quiz gate at level {}: {}",
            level,
            format_question(&question)
        );
        self.state.paused = true;
        self.state.quiz_active = true;
        self.state.active_question.insert(question)
    }

    /// Drop an open quiz without answering it (engine reached a terminal state)
    pub fn dismiss(&mut self) {
        self.state.quiz_active = false;
        self.state.paused = false;
        self.state.active_question = None;
    }

    /// Submit an answer.
    ///
    /// Malformed input returns an error and changes nothing. A correct answer
    /// restores the attempt budget and resumes. A wrong answer spends one
    /// attempt; spending the last one closes the quiz and reports `game_over`
    /// so the engine can restart.
    pub fn submit(&mut self, numerator: i64, denominator: i64) -> Result<SubmitOutcome, QuizError> {
        let Some(question) = self.state.active_question.as_ref() else {
            return Err(QuizError::NoActiveQuestion);
        };
        if let Err(e) = Fraction::new(numerator, denominator) {
            log::warn!("Rejected quiz answer {numerator}/{denominator}: {e}");
            return Err(e);
        }

        if check_answer(question, numerator, denominator) {
            self.state.attempts_remaining = self.max_attempts;
            self.dismiss();
            return Ok(SubmitOutcome {
                accepted: true,
                attempts_remaining: self.state.attempts_remaining,
                game_over: false,
            });
        }

        self.state.attempts_remaining = self.state.attempts_remaining.saturating_sub(1);
        let exhausted = self.state.attempts_remaining == 0;
        if exhausted {
            log::info!("Quiz attempts exhausted");
            self.dismiss();
        } else {
            log::debug!(
                "Wrong answer {}/{}, {} attempts left",
                numerator,
                denominator,
                self.state.attempts_remaining
            );
        }
        Ok(SubmitOutcome {
            accepted: false,
            attempts_remaining: self.state.attempts_remaining,
            game_over: exhausted,
        })
    }

    /// Submit raw text fields as typed by the player
    pub fn submit_text(
        &mut self,
        numerator: &str,
        denominator: &str,
    ) -> Result<SubmitOutcome, QuizError> {
        if self.state.active_question.is_none() {
            return Err(QuizError::NoActiveQuestion);
        }
        let numerator = parse_field(numerator)?;
        let denominator = parse_field(denominator)?;
        self.submit(numerator, denominator)
    }

    /// Wholesale reset (engine restart)
    pub fn reset(&mut self) {
        self.state = InterruptionState {
            paused: false,
            quiz_active: false,
            attempts_remaining: self.max_attempts,
            active_question: None,
        };
    }
}

fn parse_field(text: &str) -> Result<i64, QuizError> {
    text.trim().parse::<i64>().map_err(|_| {
        log::warn!("Rejected non-numeric quiz input {text:?}");
        QuizError::InvalidInput(format!("{text:?} is not a whole number"))
    })
}
