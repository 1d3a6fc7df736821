//! Error types for the domain

use thiserror::Error;

/// Result type alias using the domain error
pub type Result<T> = std::result::Result<T, DomainError>;

/// Domain error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error("{0}, you need to activate your account")]
    ActivationRequired(String),
}
