//! Screenplay pattern: actors perform actions and answer questions.
//!
//! ```text
//! Cast ──per persona──▶ Actor ──holds──▶ Abilities { name, driver, last_error }
//!                         │
//!                         ├── attempts_to(&[&dyn Action])  mutates, records first error
//!                         ├── expects_answer(Question, v)   read-only probe
//!                         └── expects_last_error_to_contain(text)
//! ```
//!
//! Actions and questions only see [`Abilities`], never a concrete backend.

mod actor;
mod cast;

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::DriverResult;

pub use actor::{Abilities, Actor, RecordedOutcome};
pub use cast::Cast;

/// A named operation that may change backend state
#[async_trait]
pub trait Action: Send + Sync {
    /// Human-readable name, used in failure messages
    fn name(&self) -> &'static str;

    async fn perform_as(&self, abilities: &Abilities) -> DriverResult<()>;
}

/// A named read-only probe
#[async_trait]
pub trait Question: Send + Sync {
    type Answer: PartialEq + Debug + Send;

    /// Human-readable name, used in failure messages
    fn name(&self) -> &'static str;

    async fn answered_by(&self, abilities: &Abilities) -> DriverResult<Self::Answer>;
}

/// Perform actions in order, stopping at the first failure. Mutations made
/// by earlier actions are kept.
pub async fn perform_all(abilities: &Abilities, actions: &[&dyn Action]) -> DriverResult<()> {
    for action in actions {
        action.perform_as(abilities).await?;
    }
    Ok(())
}
