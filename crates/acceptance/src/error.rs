//! Error types for the acceptance harness
//!
//! Three layers, innermost first:
//! - [`DriverError`]: a backend call failed. Message-preserving so the same
//!   substring assertions hold whichever backend produced it.
//! - [`ScenarioError`]: a step failed.
//! - [`HarnessError`]: the harness itself could not run (server would not
//!   start, feature file would not parse, ...).

use screenplay_domain::DomainError;
use thiserror::Error;

/// Failure of a single Driver call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ActivationRequired(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type DriverResult<T> = Result<T, DriverError>;

impl DriverError {
    /// Classify an error message reported by a remote backend
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("not found") {
            DriverError::NotFound(message)
        } else if lower.contains("activate") {
            DriverError::ActivationRequired(message)
        } else {
            DriverError::Transport(message)
        }
    }
}

impl From<DomainError> for DriverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(_) => DriverError::NotFound(e.to_string()),
            DomainError::ActivationRequired(_) => DriverError::ActivationRequired(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for DriverError {
    fn from(e: reqwest::Error) -> Self {
        DriverError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for DriverError {
    fn from(e: std::io::Error) -> Self {
        DriverError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(e: serde_json::Error) -> Self {
        DriverError::Transport(format!("malformed response: {}", e))
    }
}

/// Failure of a scenario step
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("Undefined step: {0}")]
    UndefinedStep(String),

    #[error("{actor} could not {action}: {source}")]
    ActionFailed {
        actor: String,
        action: String,
        #[source]
        source: DriverError,
    },

    #[error("{question}: expected {actual} to equal {expected}")]
    AnswerMismatch {
        question: String,
        expected: String,
        actual: String,
    },

    #[error("Expected error containing text '{expected}' but there is no error")]
    NoError { expected: String },

    #[error("Expected error text containing '{expected}' but got {actual}")]
    UnexpectedError { expected: String, actual: String },
}

/// Failure of the harness infrastructure
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Server failed to start: {0}")]
    ServerStartup(String),

    #[error("Server health check failed after {0} attempts")]
    ServerHealthCheck(usize),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Feature parse error: {0}")]
    FeatureParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
