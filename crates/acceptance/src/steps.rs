//! Step phrases and their bindings to actor operations
//!
//! A step is resolved from its text into a typed [`Step`] once, then run
//! against the scenario's [`Cast`]. The leading Gherkin keyword is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScenarioError;
use crate::library::{
    ActivateTheirAccount, AmIAuthenticated, CreateAccount, CreateProject, HowManyProjectsDoIHave,
    SignIn, SignUp,
};
use crate::screenplay::{Action, Cast, RecordedOutcome};

/// Message fragment every backend reports when sign-in precedes activation
pub const ACTIVATION_REQUIRED_TEXT: &str = "you need to activate your account";

/// The fixed set of test identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    Bob,
    Tanya,
    Sue,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Bob, Persona::Tanya, Persona::Sue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Bob => "Bob",
            Persona::Tanya => "Tanya",
            Persona::Sue => "Sue",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Persona {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ScenarioError::UndefinedStep(format!("unknown persona: {}", s)))
    }
}

/// A resolved scenario step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    HasCreatedAnAccount(Persona),
    HasSignedUp(Persona),
    ShouldBeAuthenticated(Persona),
    ShouldNotBeAuthenticated(Persona),
    ShouldNotSeeAnyProjects(Persona),
    ShouldSeeTheirProject(Persona),
    ShouldSeeActivationError(Persona),
    TriesToSignIn(Persona),
    CreatesAProject(Persona),
    ActivatesTheirAccount(Persona),
}

impl Step {
    pub fn persona(&self) -> Persona {
        match *self {
            Step::HasCreatedAnAccount(p)
            | Step::HasSignedUp(p)
            | Step::ShouldBeAuthenticated(p)
            | Step::ShouldNotBeAuthenticated(p)
            | Step::ShouldNotSeeAnyProjects(p)
            | Step::ShouldSeeTheirProject(p)
            | Step::ShouldSeeActivationError(p)
            | Step::TriesToSignIn(p)
            | Step::CreatesAProject(p)
            | Step::ActivatesTheirAccount(p) => p,
        }
    }

    /// Run the step. Returns the recorded outcome for steps that swallow
    /// their action's failure (sign-in attempts), `None` otherwise.
    pub async fn run(&self, cast: &mut Cast) -> Result<Option<RecordedOutcome>, ScenarioError> {
        let actor = cast.actor(self.persona().as_str());

        match self {
            Step::HasCreatedAnAccount(_) => {
                attempt(actor, &CreateAccount::FOR_THEMSELVES).await?;
            }
            Step::HasSignedUp(_) => attempt(actor, &SignUp).await?,
            Step::CreatesAProject(_) => attempt(actor, &CreateProject).await?,
            Step::ActivatesTheirAccount(_) => attempt(actor, &ActivateTheirAccount).await?,
            Step::TriesToSignIn(_) => {
                return Ok(Some(actor.attempts_to_and_record(&[&SignIn]).await));
            }
            Step::ShouldBeAuthenticated(_) => actor.expects_answer(&AmIAuthenticated, true).await?,
            Step::ShouldNotBeAuthenticated(_) => {
                actor.expects_answer(&AmIAuthenticated, false).await?
            }
            Step::ShouldNotSeeAnyProjects(_) => {
                actor.expects_answer(&HowManyProjectsDoIHave, 0).await?
            }
            Step::ShouldSeeTheirProject(_) => {
                actor.expects_answer(&HowManyProjectsDoIHave, 1).await?
            }
            Step::ShouldSeeActivationError(_) => {
                actor.expects_last_error_to_contain(ACTIVATION_REQUIRED_TEXT)?
            }
        }
        Ok(None)
    }
}

async fn attempt(
    actor: &mut crate::screenplay::Actor,
    action: &dyn Action,
) -> Result<(), ScenarioError> {
    actor
        .attempts_to(&[action])
        .await
        .map_err(|source| ScenarioError::ActionFailed {
            actor: actor.name().to_string(),
            action: action.name().to_string(),
            source,
        })
}

type StepBuilder = fn(Persona) -> Step;

const PERSONA: &str = "(Bob|Tanya|Sue)";

static KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(?:Given|When|Then|And|But)\s+|\*\s*)").unwrap());

/// Maps step phrases to [`Step`] values
pub struct StepRegistry {
    bindings: Vec<(Regex, StepBuilder)>,
}

impl StepRegistry {
    /// Registry with every phrase of the step library
    pub fn standard() -> Self {
        let mut registry = Self {
            bindings: Vec::new(),
        };
        registry.register("has created an account", Step::HasCreatedAnAccount);
        registry.register("has signed up", Step::HasSignedUp);
        registry.register("should be authenticated", Step::ShouldBeAuthenticated);
        registry.register("should not be authenticated", Step::ShouldNotBeAuthenticated);
        registry.register("should not see any projects", Step::ShouldNotSeeAnyProjects);
        registry.register(
            "should see (?:the|his|her|their) project",
            Step::ShouldSeeTheirProject,
        );
        registry.register(
            "should see an error telling (?:him|her|them) to activate the account",
            Step::ShouldSeeActivationError,
        );
        registry.register("tries to sign in", Step::TriesToSignIn);
        registry.register("creates a project", Step::CreatesAProject);
        registry.register(
            "activates (?:his|her|their) account",
            Step::ActivatesTheirAccount,
        );
        registry
    }

    /// Bind a phrase (regex, persona prepended) to a step constructor
    fn register(&mut self, phrase: &str, build: StepBuilder) {
        let pattern = format!(r"^{}\s+{}$", PERSONA, phrase);
        // Phrases are compile-time literals
        let regex = Regex::new(&pattern).unwrap();
        self.bindings.push((regex, build));
    }

    /// Resolve step text, ignoring its Gherkin keyword
    pub fn resolve(&self, text: &str) -> Result<Step, ScenarioError> {
        let phrase = strip_keyword(text);
        for (regex, build) in &self.bindings {
            if let Some(caps) = regex.captures(phrase) {
                let persona = caps[1].parse::<Persona>()?;
                return Ok(build(persona));
            }
        }
        Err(ScenarioError::UndefinedStep(text.trim().to_string()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn strip_keyword(text: &str) -> &str {
    let end = KEYWORD.find(text).map(|m| m.end()).unwrap_or(0);
    text[end..].trim()
}
