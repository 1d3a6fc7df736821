//! Domain-direct backend: calls straight into an in-process [`Domain`]

use async_trait::async_trait;
use parking_lot::Mutex;
use screenplay_domain::{Account, Domain, Project};

use super::Driver;
use crate::error::DriverResult;

/// Pass-through driver over an owned domain instance
#[derive(Debug, Default)]
pub struct DomainDriver {
    domain: Mutex<Domain>,
}

impl DomainDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Driver for DomainDriver {
    fn backend(&self) -> &'static str {
        "domain"
    }

    async fn create_account(&self, name: &str) -> DriverResult<()> {
        Ok(self.domain.lock().create_account(name)?)
    }

    async fn clear_all(&self) {
        self.domain.lock().clear_all();
    }

    async fn get_account(&self, name: &str) -> DriverResult<Account> {
        Ok(self.domain.lock().get_account(name)?)
    }

    async fn authenticate(&self, name: &str) -> DriverResult<()> {
        Ok(self.domain.lock().authenticate(name)?)
    }

    async fn is_authenticated(&self, name: &str) -> bool {
        self.domain.lock().is_authenticated(name)
    }

    async fn activate(&self, name: &str) -> DriverResult<()> {
        Ok(self.domain.lock().activate(name)?)
    }

    async fn create_project(&self, name: &str) -> DriverResult<()> {
        Ok(self.domain.lock().create_project(name)?)
    }

    async fn get_projects(&self, name: &str) -> DriverResult<Vec<Project>> {
        Ok(self.domain.lock().get_projects(name)?)
    }
}
