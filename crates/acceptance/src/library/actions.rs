use async_trait::async_trait;

use crate::error::DriverResult;
use crate::screenplay::{perform_all, Abilities, Action};

/// Create an account named after the actor
pub struct CreateAccount;

impl CreateAccount {
    pub const FOR_THEMSELVES: CreateAccount = CreateAccount;
}

#[async_trait]
impl Action for CreateAccount {
    fn name(&self) -> &'static str {
        "create an account"
    }

    async fn perform_as(&self, abilities: &Abilities) -> DriverResult<()> {
        abilities.driver().create_account(abilities.name()).await
    }
}

/// Activate the actor's account. An unknown account fails with NotFound.
pub struct ActivateTheirAccount;

#[async_trait]
impl Action for ActivateTheirAccount {
    fn name(&self) -> &'static str {
        "activate their account"
    }

    async fn perform_as(&self, abilities: &Abilities) -> DriverResult<()> {
        abilities.driver().activate(abilities.name()).await
    }
}

/// Create and activate an account
pub struct SignUp;

#[async_trait]
impl Action for SignUp {
    fn name(&self) -> &'static str {
        "sign up"
    }

    async fn perform_as(&self, abilities: &Abilities) -> DriverResult<()> {
        perform_all(abilities, &[&CreateAccount::FOR_THEMSELVES, &ActivateTheirAccount]).await
    }
}

pub struct SignIn;

#[async_trait]
impl Action for SignIn {
    fn name(&self) -> &'static str {
        "sign in"
    }

    async fn perform_as(&self, abilities: &Abilities) -> DriverResult<()> {
        abilities.driver().authenticate(abilities.name()).await
    }
}

pub struct CreateProject;

#[async_trait]
impl Action for CreateProject {
    fn name(&self) -> &'static str {
        "create a project"
    }

    async fn perform_as(&self, abilities: &Abilities) -> DriverResult<()> {
        abilities.driver().create_project(abilities.name()).await
    }
}
