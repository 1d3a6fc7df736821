//! Suite runner configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};
use crate::playwright::PlaywrightConfig;
use crate::server::ServerProcessConfig;

/// Which implementation backs the Driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Direct calls into an in-process domain
    #[default]
    Domain,
    /// JSON over HTTP against a server on a task of the test process
    HttpInProcess,
    /// JSON over HTTP against the spawned server binary
    HttpExecutable,
    /// Browser automation against the spawned server binary's UI
    Ui,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Backend::Domain,
        Backend::HttpInProcess,
        Backend::HttpExecutable,
        Backend::Ui,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Domain => "domain",
            Backend::HttpInProcess => "http-in-process",
            Backend::HttpExecutable => "http-executable",
            Backend::Ui => "ui",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| HarnessError::InvalidConfig(format!("unknown backend: {}", s)))
    }
}

/// Root of the workspace this crate lives in
fn workspace_root() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."))
}

/// Cargo's target directory for this workspace. `CARGO_TARGET_DIR` wins
/// when set; a relative value is taken relative to the workspace root.
pub fn target_dir() -> PathBuf {
    resolve_target_dir(std::env::var_os("CARGO_TARGET_DIR").map(PathBuf::from))
}

fn resolve_target_dir(overridden: Option<PathBuf>) -> PathBuf {
    match overridden {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => workspace_root().join(dir),
        None => workspace_root().join("target"),
    }
}

/// Configuration for the suite runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub backend: Backend,

    /// Directory searched for feature files
    pub features_dir: PathBuf,

    /// Where `test-results.json` is written
    pub output_dir: PathBuf,

    /// Only run scenarios carrying one of these tags (empty = all)
    pub tags: Vec<String>,

    pub server: ServerProcessConfig,

    pub playwright: PlaywrightConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            features_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/features")),
            output_dir: target_dir().join("test-results"),
            tags: Vec::new(),
            server: ServerProcessConfig::default(),
            playwright: PlaywrightConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("domain", Backend::Domain)]
    #[test_case("http-in-process", Backend::HttpInProcess)]
    #[test_case("http-executable", Backend::HttpExecutable)]
    #[test_case("ui", Backend::Ui)]
    fn test_backend_from_str(s: &str, expected: Backend) {
        assert_eq!(s.parse::<Backend>().unwrap(), expected);
        assert_eq!(expected.to_string(), s);
    }

    #[test]
    fn test_unknown_backend() {
        assert!(matches!(
            "grpc".parse::<Backend>(),
            Err(HarnessError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_paths_do_not_depend_on_cwd() {
        let config = RunnerConfig::default();
        assert!(config.features_dir.is_absolute());
        assert!(config.output_dir.is_absolute());
        assert!(config.output_dir.ends_with("test-results"));
        assert!(config.server.binary_path.starts_with(target_dir()));
    }

    #[test_case(None, "target" ; "workspace default")]
    #[test_case(Some("build/out"), "build/out" ; "relative override")]
    fn test_resolve_target_dir_under_workspace(overridden: Option<&str>, suffix: &str) {
        let dir = resolve_target_dir(overridden.map(PathBuf::from));
        assert!(dir.is_absolute());
        assert_eq!(dir, workspace_root().join(suffix));
    }

    #[test]
    fn test_resolve_target_dir_absolute_override() {
        let dir = resolve_target_dir(Some(PathBuf::from("/tmp/screenplay-target")));
        assert_eq!(dir, PathBuf::from("/tmp/screenplay-target"));
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acceptance.toml");
        std::fs::write(
            &path,
            r#"
backend = "http-executable"
tags = ["smoke"]

[server]
binary_path = "bin/screenplay-server"
startup_timeout_ms = 1000

[playwright]
browser = "firefox"
headless = false
"#,
        )
        .unwrap();

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config.backend, Backend::HttpExecutable);
        assert_eq!(config.tags, ["smoke"]);
        assert_eq!(config.server.startup_timeout_ms, 1000);
        assert_eq!(config.server.port, None);
        assert!(!config.playwright.headless);
        assert_eq!(config.playwright.action_timeout_ms, 5000);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            RunnerConfig::load(Path::new("/nonexistent/acceptance.toml")),
            Err(HarnessError::Io(_))
        ));
    }
}
