//! Actors and their abilities

use std::sync::Arc;
use tracing::debug;

use super::{Action, Question};
use crate::driver::Driver;
use crate::error::{DriverError, DriverResult, ScenarioError};

/// What an actor is able to do: act as a named persona against a driver
#[derive(Clone)]
pub struct Abilities {
    name: String,
    driver: Arc<dyn Driver>,
    last_error: Option<DriverError>,
}

impl Abilities {
    /// Persona name, reused as the account name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Last error any action of this actor failed with
    pub fn last_error(&self) -> Option<&DriverError> {
        self.last_error.as_ref()
    }
}

/// Outcome of an attempt whose failure is deliberately not a step failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOutcome {
    Succeeded,
    Failed(String),
}

impl std::fmt::Display for RecordedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordedOutcome::Succeeded => write!(f, "succeeded"),
            RecordedOutcome::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// A persona taking part in one scenario
pub struct Actor {
    abilities: Abilities,
}

impl Actor {
    pub fn new(name: impl Into<String>, driver: Arc<dyn Driver>) -> Self {
        Self {
            abilities: Abilities {
                name: name.into(),
                driver,
                last_error: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        self.abilities.name()
    }

    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    /// Perform actions in order. The first failure stops the sequence, is
    /// remembered as the last error and is returned.
    pub async fn attempts_to(&mut self, actions: &[&dyn Action]) -> DriverResult<()> {
        for action in actions {
            debug!("{} attempts to {}", self.name(), action.name());
            if let Err(e) = action.perform_as(&self.abilities).await {
                debug!("{} could not {}: {}", self.name(), action.name(), e);
                self.abilities.last_error = Some(e.clone());
                return Err(e);
            }
        }
        Ok(())
    }

    /// Like [`Actor::attempts_to`], but a failure is only recorded (as the
    /// last error and in the returned outcome), never propagated. Used where
    /// a later step asserts on the error.
    pub async fn attempts_to_and_record(&mut self, actions: &[&dyn Action]) -> RecordedOutcome {
        match self.attempts_to(actions).await {
            Ok(()) => RecordedOutcome::Succeeded,
            Err(e) => RecordedOutcome::Failed(e.to_string()),
        }
    }

    /// Ask a question and compare the answer. A question that cannot be
    /// answered counts as no answer, not as a mismatch.
    pub async fn expects_answer<Q: Question>(
        &self,
        question: &Q,
        expected: Q::Answer,
    ) -> Result<(), ScenarioError> {
        let answer = match question.answered_by(&self.abilities).await {
            Ok(answer) => answer,
            Err(e) => {
                debug!("{} got no answer to {}: {}", self.name(), question.name(), e);
                return Ok(());
            }
        };

        if answer != expected {
            return Err(ScenarioError::AnswerMismatch {
                question: question.name().to_string(),
                expected: format!("{:?}", expected),
                actual: format!("{:?}", answer),
            });
        }
        Ok(())
    }

    /// Require the last recorded error to mention `text`
    pub fn expects_last_error_to_contain(&self, text: &str) -> Result<(), ScenarioError> {
        match &self.abilities.last_error {
            None => Err(ScenarioError::NoError {
                expected: text.to_string(),
            }),
            Some(e) if e.to_string().contains(text) => Ok(()),
            Some(e) => Err(ScenarioError::UnexpectedError {
                expected: text.to_string(),
                actual: e.to_string(),
            }),
        }
    }
}
