//! Playwright browser automation
//!
//! Each call generates a small Node script, runs it with `node` and reads a
//! single JSON line back from stdout. Scripts are stateless: every call
//! launches its own browser, so no session leaks between Driver calls.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::{DriverError, DriverResult, HarnessError, HarnessResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(HarnessError::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    /// URL of the server hosting the UI
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    /// Timeout for each wait/click inside the page
    pub action_timeout_ms: u64,
    /// Hard limit for a whole script run
    pub script_timeout_ms: u64,
    /// Directory containing the `playwright` node module, exported as `NODE_PATH`
    pub node_modules: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            browser: Browser::Chromium,
            headless: true,
            action_timeout_ms: 5000,
            script_timeout_ms: 30_000,
            node_modules: None,
        }
    }
}

/// What a script observed on the page
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScriptOutcome {
    /// Text of a visible `.error` element
    #[serde(default)]
    pub error: Option<String>,
    /// Visibility of named indicator elements
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    /// Number of counted elements, if the script counted any
    #[serde(default)]
    pub count: Option<usize>,
}

impl ScriptOutcome {
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Runs generated Playwright scripts
#[derive(Debug, Clone)]
pub struct PlaywrightRunner {
    config: PlaywrightConfig,
}

impl PlaywrightRunner {
    /// Create a runner, verifying Playwright is installed
    pub fn new(config: PlaywrightConfig) -> HarnessResult<Self> {
        Self::check_playwright_installed()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> HarnessResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(HarnessError::PlaywrightNotFound),
        }
    }

    /// Wrap a script body with browser setup, the `outcome` helper and result reporting
    pub fn build_script(&self, body: &str) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"
const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const page = await browser.newPage();
  page.setDefaultTimeout({timeout});
  const baseUrl = {base_url};
  const result = {{ error: null, flags: {{}}, count: null }};

  // Waits for either the success selector or an .error element.
  async function outcome(successSelector) {{
    const el = await page.waitForSelector(`${{successSelector}}, .error`);
    const classes = ((await el.getAttribute('class')) || '').split(/\s+/);
    if (classes.includes('error')) {{
      result.error = ((await el.textContent()) || '').trim();
      return false;
    }}
    return true;
  }}

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            timeout = self.config.action_timeout_ms,
            base_url = js_string(self.config.base_url.trim_end_matches('/')),
        ));

        for line in body.lines() {
            script.push_str("    ");
            script.push_str(line);
            script.push('\n');
        }

        script.push_str(
            r#"
    console.log(JSON.stringify(result));
  } catch (error) {
    console.error(JSON.stringify({ error: error.message }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Run a script body and parse the reported outcome
    pub async fn run(&self, body: &str) -> DriverResult<ScriptOutcome> {
        let script = self.build_script(body);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("driver.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .current_dir(temp_dir.path())
            .kill_on_drop(true);
        if let Some(modules) = &self.config.node_modules {
            cmd.env("NODE_PATH", modules);
        }

        let limit = Duration::from_millis(self.config.script_timeout_ms);
        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| DriverError::Transport(format!("browser script timed out after {:?}", limit)))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DriverError::Transport(format!(
                "browser script failed: {}",
                stderr.trim()
            )));
        }

        parse_outcome(&stdout)
    }
}

/// Parse the last non-empty stdout line as the script outcome
fn parse_outcome(stdout: &str) -> DriverResult<ScriptOutcome> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| DriverError::Transport("browser script produced no output".to_string()))?;
    Ok(serde_json::from_str(line)?)
}

/// Render a Rust string as a JavaScript string literal
pub fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> PlaywrightRunner {
        PlaywrightRunner {
            config: PlaywrightConfig::default(),
        }
    }

    #[test]
    fn test_build_script_wraps_body() {
        let script = runner().build_script("await page.goto(baseUrl + '/ui/login');");
        assert!(script.contains("chromium.launch({ headless: true })"));
        assert!(script.contains("page.setDefaultTimeout(5000)"));
        assert!(script.contains("const baseUrl = \"http://127.0.0.1:8080\";"));
        assert!(script.contains("    await page.goto(baseUrl + '/ui/login');"));
        assert!(script.contains("console.log(JSON.stringify(result));"));
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("Sue"), "\"Sue\"");
        assert_eq!(js_string("O'Neil \"x\""), "\"O'Neil \\\"x\\\"\"");
    }

    #[test]
    fn test_parse_outcome_takes_last_line() {
        let stdout = "noise\n{\"error\":null,\"flags\":{\"authenticated\":true},\"count\":null}\n\n";
        let outcome = parse_outcome(stdout).unwrap();
        assert!(outcome.flag("authenticated"));
        assert!(!outcome.flag("activated"));
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn test_parse_outcome_requires_output() {
        assert!(matches!(parse_outcome("  \n"), Err(DriverError::Transport(_))));
    }

    #[test]
    fn test_browser_from_str() {
        assert_eq!("webkit".parse::<Browser>().unwrap(), Browser::Webkit);
        assert!("lynx".parse::<Browser>().is_err());
    }
}
