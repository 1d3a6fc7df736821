use async_trait::async_trait;

use crate::error::DriverResult;
use crate::screenplay::{Abilities, Question};

/// Whether the actor's account is authenticated; never fails
pub struct AmIAuthenticated;

#[async_trait]
impl Question for AmIAuthenticated {
    type Answer = bool;

    fn name(&self) -> &'static str {
        "am I authenticated"
    }

    async fn answered_by(&self, abilities: &Abilities) -> DriverResult<bool> {
        Ok(abilities.driver().is_authenticated(abilities.name()).await)
    }
}

/// Number of projects the actor owns
pub struct HowManyProjectsDoIHave;

#[async_trait]
impl Question for HowManyProjectsDoIHave {
    type Answer = usize;

    fn name(&self) -> &'static str {
        "how many projects do I have"
    }

    async fn answered_by(&self, abilities: &Abilities) -> DriverResult<usize> {
        let projects = abilities.driver().get_projects(abilities.name()).await?;
        Ok(projects.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DomainDriver;
    use crate::library::{CreateProject, SignUp};
    use crate::screenplay::Actor;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_questions_answer_from_driver() {
        let mut tanya = Actor::new("Tanya", Arc::new(DomainDriver::new()));

        assert_eq!(tanya.expects_answer(&AmIAuthenticated, false).await, Ok(()));

        tanya.attempts_to(&[&SignUp, &CreateProject]).await.unwrap();

        assert_eq!(tanya.expects_answer(&AmIAuthenticated, true).await, Ok(()));
        assert_eq!(tanya.expects_answer(&HowManyProjectsDoIHave, 1).await, Ok(()));
        assert!(tanya.expects_answer(&HowManyProjectsDoIHave, 0).await.is_err());
    }
}
