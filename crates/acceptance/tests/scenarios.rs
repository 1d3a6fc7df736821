//! Scenarios written directly as Rust, one step call per line

use std::sync::Arc;

use screenplay_acceptance::driver::{DomainDriver, Driver, HttpDriver};
use screenplay_acceptance::server::InProcessServer;
use screenplay_acceptance::{Cast, Persona, Step};
use screenplay_domain::Domain;

use Persona::{Bob, Sue, Tanya};

async fn domain() -> (Cast, Option<InProcessServer>) {
    (Cast::new(Arc::new(DomainDriver::new())), None)
}

async fn http() -> (Cast, Option<InProcessServer>) {
    let server = InProcessServer::start(Domain::new()).await.unwrap();
    let driver: Arc<dyn Driver> = Arc::new(HttpDriver::new(server.base_url()).unwrap());
    driver.clear_all().await;
    (Cast::new(driver), Some(server))
}

async fn given(cast: &mut Cast, steps: &[Step]) {
    for step in steps {
        step.run(cast)
            .await
            .unwrap_or_else(|e| panic!("{:?} failed: {}", step, e));
    }
}

macro_rules! on_every_backend {
    ($($name:ident => $body:expr;)*) => {
        mod on_domain {
            use super::*;
            $(
                #[tokio::test]
                async fn $name() {
                    let (mut cast, _server) = domain().await;
                    given(&mut cast, &$body).await;
                }
            )*
        }

        mod on_http {
            use super::*;
            $(
                #[tokio::test]
                async fn $name() {
                    let (mut cast, _server) = http().await;
                    given(&mut cast, &$body).await;
                }
            )*
        }
    };
}

on_every_backend! {
    successful_sign_up => [
        Step::HasCreatedAnAccount(Tanya),
        Step::ActivatesTheirAccount(Tanya),
        Step::ShouldBeAuthenticated(Tanya),
    ];
    sign_in_without_activating => [
        Step::HasCreatedAnAccount(Bob),
        Step::TriesToSignIn(Bob),
        Step::ShouldNotBeAuthenticated(Bob),
        Step::ShouldSeeActivationError(Bob),
    ];
    create_one_project => [
        Step::HasSignedUp(Sue),
        Step::CreatesAProject(Sue),
        Step::ShouldSeeTheirProject(Sue),
    ];
    someone_elses_project => [
        Step::HasSignedUp(Sue),
        Step::HasSignedUp(Bob),
        Step::CreatesAProject(Sue),
        Step::ShouldNotSeeAnyProjects(Bob),
    ];
}

#[tokio::test]
async fn test_activation_error_needs_a_failed_sign_in() {
    let (mut cast, _server) = domain().await;

    given(&mut cast, &[Step::HasSignedUp(Bob), Step::TriesToSignIn(Bob)]).await;

    assert!(Step::ShouldSeeActivationError(Bob)
        .run(&mut cast)
        .await
        .is_err());
}
