//! Screenplay Acceptance Suite
//!
//! One set of scenarios, written once against the [`driver::Driver`]
//! contract, executed unchanged against interchangeable backends:
//! - the domain called directly
//! - the HTTP API (server in-process, or the spawned binary)
//! - the browser UI, driven by Playwright
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SuiteRunner                                                │
//! │    ├── run_features(features, tags) -> SuiteResult          │
//! │    └── run_scenario(scenario)                               │
//! │          clear_all ─▶ fresh Cast ─▶ steps in order          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StepRegistry: "Bob tries to sign in" -> Step               │
//! │  Step::run(&mut Cast)                                       │
//! │    └── Actor { Abilities { name, driver, last_error } }     │
//! │          ├── attempts_to(Action...)                         │
//! │          └── expects_answer(Question, expected)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  dyn Driver                                                 │
//! │    ├── DomainDriver   direct calls                          │
//! │    ├── HttpDriver     JSON over HTTP                        │
//! │    └── UiDriver       Playwright scripts                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod feature;
pub mod library;
pub mod playwright;
pub mod runner;
pub mod screenplay;
pub mod server;
pub mod steps;

pub use config::{Backend, RunnerConfig};
pub use driver::Driver;
pub use error::{DriverError, DriverResult, HarnessError, HarnessResult, ScenarioError};
pub use feature::{FeatureSpec, ScenarioSpec};
pub use runner::{run_suite, ScenarioResult, Session, SuiteResult, SuiteRunner};
pub use screenplay::{Actor, Cast};
pub use steps::{Persona, Step, StepRegistry};
