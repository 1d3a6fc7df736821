//! Screenplay Domain
//!
//! The small account/project state machine that every backend of the
//! acceptance suite ultimately drives.
//!
//! ```text
//! Unknown ──create──▶ Created ──activate──▶ Activated + Authenticated
//!                        │
//!                        └──authenticate──▶ ActivationRequired (no change)
//! ```

pub mod error;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::{DomainError, Result};

/// Snapshot of an account, handed out by value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub activated: bool,
    pub authenticated: bool,
}

impl Account {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            activated: false,
            authenticated: false,
        }
    }
}

/// A project owned by exactly one account. Projects carry no attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {}

/// In-memory account and project store
#[derive(Debug, Default)]
pub struct Domain {
    accounts: HashMap<String, Account>,
    projects: HashMap<String, Vec<Project>>,
}

impl Domain {
    /// Create an empty domain
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every account and project
    pub fn clear_all(&mut self) {
        debug!(
            accounts = self.accounts.len(),
            "clearing all accounts and projects"
        );
        self.accounts.clear();
        self.projects.clear();
    }

    /// Create an account, replacing any existing account of the same name
    /// together with its projects.
    pub fn create_account(&mut self, name: &str) -> Result<()> {
        debug!(name, "creating account");
        self.accounts.insert(name.to_string(), Account::new(name));
        self.projects.remove(name);
        Ok(())
    }

    /// Get a snapshot of an account
    pub fn get_account(&self, name: &str) -> Result<Account> {
        self.accounts
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(name.to_string()))
    }

    /// Activate an account. Activation also authenticates the account.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let account = self.account_mut(name)?;
        account.activated = true;
        account.authenticated = true;
        debug!(name, "account activated");
        Ok(())
    }

    /// Authenticate an account; only activated accounts may authenticate
    pub fn authenticate(&mut self, name: &str) -> Result<()> {
        let account = self.account_mut(name)?;
        if !account.activated {
            return Err(DomainError::ActivationRequired(name.to_string()));
        }
        account.authenticated = true;
        Ok(())
    }

    /// Whether the account exists and is authenticated
    pub fn is_authenticated(&self, name: &str) -> bool {
        self.accounts
            .get(name)
            .map(|account| account.authenticated)
            .unwrap_or(false)
    }

    /// Add a project to an account
    pub fn create_project(&mut self, name: &str) -> Result<()> {
        if !self.accounts.contains_key(name) {
            return Err(DomainError::NotFound(name.to_string()));
        }
        let projects = self.projects.entry(name.to_string()).or_default();
        projects.push(Project::default());
        debug!(name, count = projects.len(), "project created");
        Ok(())
    }

    /// Projects owned by an account, in creation order
    pub fn get_projects(&self, name: &str) -> Result<Vec<Project>> {
        if !self.accounts.contains_key(name) {
            return Err(DomainError::NotFound(name.to_string()));
        }
        Ok(self.projects.get(name).cloned().unwrap_or_default())
    }

    fn account_mut(&mut self, name: &str) -> Result<&mut Account> {
        self.accounts
            .get_mut(name)
            .ok_or_else(|| DomainError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn signed_up(name: &str) -> Domain {
        let mut domain = Domain::new();
        domain.create_account(name).unwrap();
        domain.activate(name).unwrap();
        domain
    }

    #[test_case("Bob")]
    #[test_case("Tanya")]
    #[test_case("Sue")]
    fn test_unknown_account_is_not_found(name: &str) {
        let mut domain = Domain::new();

        assert_eq!(domain.get_account(name), Err(DomainError::NotFound(name.into())));
        assert_eq!(domain.authenticate(name), Err(DomainError::NotFound(name.into())));
        assert_eq!(domain.activate(name), Err(DomainError::NotFound(name.into())));
        assert_eq!(domain.create_project(name), Err(DomainError::NotFound(name.into())));
        assert_eq!(domain.get_projects(name), Err(DomainError::NotFound(name.into())));
        assert!(!domain.is_authenticated(name));
    }

    #[test]
    fn test_authenticate_before_activation() {
        let mut domain = Domain::new();
        domain.create_account("Bob").unwrap();

        let err = domain.authenticate("Bob").unwrap_err();
        assert!(err.to_string().contains("you need to activate your account"));
        assert_eq!(err.to_string(), "Bob, you need to activate your account");
        assert!(!domain.is_authenticated("Bob"));

        let account = domain.get_account("Bob").unwrap();
        assert!(!account.activated);
        assert!(!account.authenticated);
    }

    #[test]
    fn test_activation_also_authenticates() {
        let domain = signed_up("Tanya");

        assert!(domain.is_authenticated("Tanya"));
        assert_eq!(
            domain.get_account("Tanya").unwrap(),
            Account {
                name: "Tanya".into(),
                activated: true,
                authenticated: true,
            }
        );
    }

    #[test]
    fn test_authenticate_after_activation_is_noop_success() {
        let mut domain = signed_up("Sue");

        domain.authenticate("Sue").unwrap();
        domain.authenticate("Sue").unwrap();
        assert!(domain.is_authenticated("Sue"));
    }

    #[test]
    fn test_create_account_overwrites() {
        let mut domain = signed_up("Sue");
        domain.create_project("Sue").unwrap();

        domain.create_account("Sue").unwrap();

        let account = domain.get_account("Sue").unwrap();
        assert!(!account.activated);
        assert!(!account.authenticated);
        assert!(domain.get_projects("Sue").unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let mut domain = signed_up("Bob");
        domain.create_project("Bob").unwrap();

        domain.clear_all();
        assert!(domain.get_account("Bob").is_err());
        domain.clear_all();
        assert!(domain.get_account("Bob").is_err());
        assert!(domain.get_projects("Bob").is_err());
    }

    #[test_case(0, 0)]
    #[test_case(1, 0)]
    #[test_case(3, 2)]
    fn test_projects_are_isolated_per_account(sue: usize, bob: usize) {
        let mut domain = signed_up("Sue");
        domain.create_account("Bob").unwrap();

        // interleave to show call order does not matter
        for i in 0..sue.max(bob) {
            if i < bob {
                domain.create_project("Bob").unwrap();
            }
            if i < sue {
                domain.create_project("Sue").unwrap();
            }
        }

        assert_eq!(domain.get_projects("Sue").unwrap().len(), sue);
        assert_eq!(domain.get_projects("Bob").unwrap().len(), bob);
    }

    #[test]
    fn test_projects_survive_activation() {
        let mut domain = Domain::new();
        domain.create_account("Tanya").unwrap();
        domain.create_project("Tanya").unwrap();
        domain.activate("Tanya").unwrap();

        assert_eq!(domain.get_projects("Tanya").unwrap().len(), 1);
    }

    #[test]
    fn test_project_serializes_as_empty_object() {
        let json = serde_json::to_string(&vec![Project::default()]).unwrap();
        assert_eq!(json, "[{}]");
    }
}
