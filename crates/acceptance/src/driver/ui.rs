//! Browser backend: drives the server's UI through Playwright
//!
//! Results are read off indicator elements. A visible `.error` becomes a
//! [`DriverError`] classified by its text.

use async_trait::async_trait;
use screenplay_domain::{Account, Project};
use tracing::{debug, warn};

use super::Driver;
use crate::error::{DriverError, DriverResult, HarnessResult};
use crate::playwright::{js_string, PlaywrightConfig, PlaywrightRunner, ScriptOutcome};

/// Driver clicking through the browser UI
#[derive(Debug, Clone)]
pub struct UiDriver {
    runner: PlaywrightRunner,
}

impl UiDriver {
    /// Create a driver; fails when Playwright is not installed
    pub fn new(config: PlaywrightConfig) -> HarnessResult<Self> {
        Ok(Self {
            runner: PlaywrightRunner::new(config)?,
        })
    }

    async fn run(&self, op: &str, name: &str, body: String) -> DriverResult<ScriptOutcome> {
        debug!("UI: {} for {}", op, name);
        let outcome = self.runner.run(&body).await?;
        match &outcome.error {
            Some(message) => Err(DriverError::from_backend_message(message.clone())),
            None => Ok(outcome),
        }
    }
}

/// Page path below `/ui` with the account name as a JS expression
fn page(prefix: &str, name: &str, suffix: &str) -> String {
    format!(
        "await page.goto(baseUrl + {});",
        js_string(&format!("/ui/{}{}{}", prefix, urlencoding::encode(name), suffix))
    )
}

fn submit_name_form(path: &str, name: &str) -> String {
    format!(
        r#"await page.goto(baseUrl + {path});
await page.fill("input[name='name']", {name});
await page.click("button[type='submit']");
await outcome('.success');"#,
        path = js_string(path),
        name = js_string(name),
    )
}

fn read_account_flags(name: &str) -> String {
    format!(
        r#"{goto}
if (await outcome('.account-info')) {{
  result.flags.activated = await page.isVisible('.status-activated');
  result.flags.authenticated = await page.isVisible('.status-authenticated');
}}"#,
        goto = page("account/", name, "")
    )
}

/// The list itself has no height while empty, so wait on the always
/// visible create button instead
fn read_project_count(name: &str) -> String {
    format!(
        r#"{goto}
if (await outcome('button.create-project')) {{
  result.count = await page.locator('.projects-list .project-item').count();
}}"#,
        goto = page("account/", name, "/projects")
    )
}

#[async_trait]
impl Driver for UiDriver {
    fn backend(&self) -> &'static str {
        "ui"
    }

    async fn create_account(&self, name: &str) -> DriverResult<()> {
        self.run("create account", name, submit_name_form("/ui/signup", name))
            .await?;
        Ok(())
    }

    async fn clear_all(&self) {
        let body = "await page.goto(baseUrl + '/ui/admin/clear');\nawait outcome('.success');";
        if let Err(e) = self.run("clear all", "*", body.to_string()).await {
            warn!("failed to clear data via UI: {}", e);
        }
    }

    async fn get_account(&self, name: &str) -> DriverResult<Account> {
        let outcome = self.run("get account", name, read_account_flags(name)).await?;
        Ok(Account {
            name: name.to_string(),
            activated: outcome.flag("activated"),
            authenticated: outcome.flag("authenticated"),
        })
    }

    async fn authenticate(&self, name: &str) -> DriverResult<()> {
        self.run("authenticate", name, submit_name_form("/ui/login", name))
            .await?;
        Ok(())
    }

    async fn is_authenticated(&self, name: &str) -> bool {
        match self
            .run("check authentication", name, read_account_flags(name))
            .await
        {
            Ok(outcome) => outcome.flag("authenticated"),
            Err(e) => {
                debug!("authentication status unavailable for {}: {}", name, e);
                false
            }
        }
    }

    async fn activate(&self, name: &str) -> DriverResult<()> {
        let body = format!(
            "{}\nawait page.click('button.activate');\nawait outcome('.success');",
            page("activate/", name, "")
        );
        self.run("activate", name, body).await?;
        Ok(())
    }

    async fn create_project(&self, name: &str) -> DriverResult<()> {
        let body = format!(
            r#"{goto}
if (await outcome('button.create-project')) {{
  await page.click('button.create-project');
  await outcome('.project-created');
}}"#,
            goto = page("account/", name, "/projects")
        );
        self.run("create project", name, body).await?;
        Ok(())
    }

    async fn get_projects(&self, name: &str) -> DriverResult<Vec<Project>> {
        let outcome = self
            .run("get projects", name, read_project_count(name))
            .await?;
        let count = outcome
            .count
            .ok_or_else(|| DriverError::Transport("projects list was not read".to_string()))?;
        Ok(vec![Project::default(); count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_encodes_name() {
        assert_eq!(
            page("account/", "Sue Ann", "/projects"),
            "await page.goto(baseUrl + \"/ui/account/Sue%20Ann/projects\");"
        );
    }

    #[test]
    fn test_submit_name_form() {
        let body = submit_name_form("/ui/login", "Bob");
        assert!(body.starts_with("await page.goto(baseUrl + \"/ui/login\");"));
        assert!(body.contains("page.fill(\"input[name='name']\", \"Bob\")"));
        assert!(body.ends_with("await outcome('.success');"));
    }

    #[test]
    fn test_project_count_waits_on_visible_element() {
        let body = read_project_count("Sue");
        assert!(body.starts_with("await page.goto(baseUrl + \"/ui/account/Sue/projects\");"));
        assert!(body.contains("await outcome('button.create-project')"));
        assert!(!body.contains("outcome('.projects-list')"));
        assert!(body.contains("result.count = await page.locator('.projects-list .project-item').count();"));
    }
}
