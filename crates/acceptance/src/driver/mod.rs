//! The Driver contract and its backends
//!
//! Every backend exposes the same eight operations with the same
//! success/failure semantics. The suite only ever sees `dyn Driver`.

pub mod domain;
pub mod http;
pub mod ui;

use async_trait::async_trait;
use screenplay_domain::{Account, Project};

use crate::error::DriverResult;

pub use domain::DomainDriver;
pub use http::HttpDriver;
pub use ui::UiDriver;

/// Capability surface of the system under test
#[async_trait]
pub trait Driver: Send + Sync {
    /// Short backend name used in logs and reports
    fn backend(&self) -> &'static str;

    /// Create (or replace) an account
    async fn create_account(&self, name: &str) -> DriverResult<()>;

    /// Reset all state. Best effort: failures are logged, never returned.
    async fn clear_all(&self);

    /// Snapshot of an account
    async fn get_account(&self, name: &str) -> DriverResult<Account>;

    /// Authenticate; fails until the account is activated
    async fn authenticate(&self, name: &str) -> DriverResult<()>;

    /// Whether the account is authenticated. Never fails.
    async fn is_authenticated(&self, name: &str) -> bool;

    /// Activate (and thereby authenticate) an account
    async fn activate(&self, name: &str) -> DriverResult<()>;

    /// Add a project to an account
    async fn create_project(&self, name: &str) -> DriverResult<()>;

    /// Projects owned by an account
    async fn get_projects(&self, name: &str) -> DriverResult<Vec<Project>>;
}
