//! Suite runner: executes feature scenarios against one Driver
//!
//! Every scenario starts from `clear_all` and a fresh [`Cast`]. Steps run
//! strictly in order; after the first failing step the rest are skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use screenplay_domain::Domain;

use crate::config::{Backend, RunnerConfig};
use crate::driver::{DomainDriver, Driver, HttpDriver, UiDriver};
use crate::error::HarnessResult;
use crate::feature::{FeatureSpec, ScenarioSpec};
use crate::screenplay::Cast;
use crate::server::{InProcessServer, ServerHandle};
use crate::steps::StepRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// Result of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub text: String,
    pub status: StepStatus,
    pub error: Option<String>,
    /// Outcome swallowed by a sign-in attempt, kept for the report
    pub recorded_outcome: Option<String>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub feature: String,
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// The step that failed the scenario
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }
}

/// Result of running a suite against one backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub backend: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Scenario outcomes as `(feature, scenario, success)`, in run order
    pub fn outcomes(&self) -> Vec<(String, String, bool)> {
        self.results
            .iter()
            .map(|r| (r.feature.clone(), r.name.clone(), r.success))
            .collect()
    }

    /// Write the result as `test-results.json` below `dir`
    pub fn write_results(&self, dir: &Path) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("test-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Runs scenarios against a single Driver
pub struct SuiteRunner {
    driver: Arc<dyn Driver>,
    registry: StepRegistry,
}

impl SuiteRunner {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            registry: StepRegistry::standard(),
        }
    }

    /// Run every scenario of `features` that passes the tag filter
    pub async fn run_features(&self, features: &[FeatureSpec], tags: &[String]) -> SuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();

        info!("Running features against the {} backend", self.driver.backend());

        for feature in features {
            for scenario in &feature.scenarios {
                if !scenario.matches_tags(feature, tags) {
                    debug!("Skipping scenario '{}' (tags)", scenario.name);
                    continue;
                }

                let result = self.run_scenario(&feature.feature, scenario).await;
                if result.success {
                    info!("✓ {} / {} ({} ms)", result.feature, result.name, result.duration_ms);
                } else {
                    error!(
                        "✗ {} / {} - {}",
                        result.feature,
                        result.name,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
                results.push(result);
            }
        }

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Scenario results ({}): {} passed, {} failed ({} ms)",
            self.driver.backend(),
            passed,
            failed,
            duration_ms
        );

        SuiteResult {
            backend: self.driver.backend().to_string(),
            total: results.len(),
            passed,
            failed,
            duration_ms,
            started_at,
            results,
        }
    }

    /// Run one scenario from a clean backend with a fresh cast
    pub async fn run_scenario(&self, feature: &str, scenario: &ScenarioSpec) -> ScenarioResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        self.driver.clear_all().await;
        let mut cast = Cast::new(self.driver.clone());

        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut scenario_error: Option<String> = None;

        for text in &scenario.steps {
            if scenario_error.is_some() {
                steps.push(StepResult {
                    text: text.clone(),
                    status: StepStatus::Skipped,
                    error: None,
                    recorded_outcome: None,
                });
                continue;
            }

            let outcome = match self.registry.resolve(text) {
                Ok(step) => step.run(&mut cast).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(recorded) => {
                    debug!("  step passed: {}", text);
                    steps.push(StepResult {
                        text: text.clone(),
                        status: StepStatus::Passed,
                        error: None,
                        recorded_outcome: recorded.map(|o| o.to_string()),
                    });
                }
                Err(e) => {
                    let message = format!("step '{}' failed: {}", text.trim(), e);
                    steps.push(StepResult {
                        text: text.clone(),
                        status: StepStatus::Failed,
                        error: Some(e.to_string()),
                        recorded_outcome: None,
                    });
                    scenario_error = Some(message);
                }
            }
        }

        ScenarioResult {
            feature: feature.to_string(),
            name: scenario.name.clone(),
            success: scenario_error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error: scenario_error,
        }
    }
}

/// Server kept alive for as long as a session uses it
enum ServerGuard {
    None,
    InProcess(InProcessServer),
    Process(ServerHandle),
}

/// A Driver for the configured backend together with whatever server it
/// talks to. Dropping the session stops the server.
pub struct Session {
    driver: Arc<dyn Driver>,
    server: ServerGuard,
}

impl Session {
    /// Bring up the configured backend
    pub async fn start(config: &RunnerConfig) -> HarnessResult<Self> {
        info!("Starting {} backend", config.backend);

        let (driver, server): (Arc<dyn Driver>, ServerGuard) = match config.backend {
            Backend::Domain => (Arc::new(DomainDriver::new()), ServerGuard::None),
            Backend::HttpInProcess => {
                let server = InProcessServer::start(Domain::new()).await?;
                let driver = HttpDriver::new(server.base_url())?;
                (Arc::new(driver), ServerGuard::InProcess(server))
            }
            Backend::HttpExecutable => {
                let server = ServerHandle::spawn(config.server.clone()).await?;
                let driver = HttpDriver::new(server.base_url())?;
                (Arc::new(driver), ServerGuard::Process(server))
            }
            Backend::Ui => {
                let mut server_config = config.server.clone();
                server_config.serve_ui = true;
                let server = ServerHandle::spawn(server_config).await?;
                let mut playwright = config.playwright.clone();
                playwright.base_url = server.base_url().to_string();
                let driver = UiDriver::new(playwright)?;
                (Arc::new(driver), ServerGuard::Process(server))
            }
        };

        Ok(Self { driver, server })
    }

    pub fn driver(&self) -> Arc<dyn Driver> {
        self.driver.clone()
    }

    pub fn runner(&self) -> SuiteRunner {
        SuiteRunner::new(self.driver())
    }

    /// Stop the server, if any
    pub async fn stop(self) -> HarnessResult<()> {
        match self.server {
            ServerGuard::None => Ok(()),
            ServerGuard::InProcess(server) => server.stop().await,
            ServerGuard::Process(mut server) => server.stop(),
        }
    }
}

/// Load the configured features, run them on the configured backend and
/// write `test-results.json`
pub async fn run_suite(config: &RunnerConfig) -> HarnessResult<SuiteResult> {
    let features = FeatureSpec::load_all(&config.features_dir)?;
    let session = Session::start(config).await?;

    let result = session.runner().run_features(&features, &config.tags).await;
    result.write_results(&config.output_dir)?;

    session.stop().await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(steps: &[&str]) -> ScenarioSpec {
        ScenarioSpec {
            name: "scenario".to_string(),
            tags: vec![],
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn runner() -> SuiteRunner {
        SuiteRunner::new(Arc::new(DomainDriver::new()))
    }

    #[tokio::test]
    async fn test_steps_after_failure_are_skipped() {
        let result = runner()
            .run_scenario(
                "Create project",
                &scenario(&[
                    "Given Sue has created an account",
                    "Then Sue should be authenticated",
                    "When Sue creates a project",
                ]),
            )
            .await;

        assert!(!result.success);
        let statuses: Vec<_> = result.steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            [StepStatus::Passed, StepStatus::Failed, StepStatus::Skipped]
        );
        assert_eq!(
            result.failed_step().unwrap().error.as_deref(),
            Some("am I authenticated: expected false to equal true")
        );
    }

    #[tokio::test]
    async fn test_undefined_step_fails_scenario() {
        let result = runner()
            .run_scenario("Sign up", &scenario(&["Given Bob juggles"]))
            .await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("step 'Given Bob juggles' failed: Undefined step: Given Bob juggles")
        );
    }

    #[tokio::test]
    async fn test_state_does_not_leak_between_scenarios() {
        let runner = runner();

        let first = runner
            .run_scenario("Sign up", &scenario(&["Given Bob has signed up"]))
            .await;
        let second = runner
            .run_scenario(
                "Sign up",
                &scenario(&[
                    "Then Bob should not be authenticated",
                    "And Bob should not see any projects",
                ]),
            )
            .await;

        assert!(first.success);
        assert!(second.success, "{:?}", second.error);
    }

    #[tokio::test]
    async fn test_sign_in_outcome_is_reported() {
        let result = runner()
            .run_scenario(
                "Sign up",
                &scenario(&["Given Bob has created an account", "When Bob tries to sign in"]),
            )
            .await;

        assert!(result.success);
        assert_eq!(
            result.steps[1].recorded_outcome.as_deref(),
            Some("failed: Bob, you need to activate your account")
        );
    }

    #[tokio::test]
    async fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let feature = FeatureSpec {
            feature: "Sign up".to_string(),
            description: String::new(),
            tags: vec![],
            scenarios: vec![scenario(&["Given Tanya has signed up"])],
            path: None,
        };

        let result = runner().run_features(&[feature], &[]).await;
        let path = result.write_results(dir.path()).unwrap();

        let written: SuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.backend, "domain");
        assert_eq!((written.total, written.passed, written.failed), (1, 1, 0));
        assert!(written.success());
    }
}
