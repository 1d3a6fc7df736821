//! HTTP backend: speaks the server's JSON API

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use screenplay_domain::{Account, Project};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::Driver;
use crate::error::{DriverError, DriverResult};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Driver talking to a running `screenplay-server`
#[derive(Debug, Clone)]
pub struct HttpDriver {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct AuthenticationStatus {
    authenticated: bool,
}

impl HttpDriver {
    /// Create a driver for the server at `base_url`
    pub fn new(base_url: impl Into<String>) -> DriverResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a driver with a custom per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> DriverResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self, name: &str, suffix: &str) -> String {
        format!("{}/accounts/{}{}", self.base_url, urlencoding::encode(name), suffix)
    }

    async fn authentication_status(&self, name: &str) -> DriverResult<AuthenticationStatus> {
        let response = self
            .client
            .get(self.account_url(name, "/authentication-status"))
            .send()
            .await?;
        let text = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Map a non-success response onto the driver error taxonomy
    async fn check(response: Response) -> DriverResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| text.trim().to_string());
        debug!(%status, %message, "backend rejected request");

        Err(match status {
            StatusCode::NOT_FOUND => DriverError::NotFound(message),
            StatusCode::BAD_REQUEST if message.contains("activate") => {
                DriverError::ActivationRequired(message)
            }
            _ => DriverError::Transport(format!("unexpected status {}: {}", status, message)),
        })
    }
}

#[async_trait]
impl Driver for HttpDriver {
    fn backend(&self) -> &'static str {
        "http"
    }

    async fn create_account(&self, name: &str) -> DriverResult<()> {
        let response = self
            .client
            .post(format!("{}/accounts", self.base_url))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn clear_all(&self) {
        let result = self
            .client
            .delete(format!("{}/clear", self.base_url))
            .send()
            .await
            .map_err(DriverError::from);
        let result = match result {
            Ok(response) => Self::check(response).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("failed to clear backend state: {}", e);
        }
    }

    async fn get_account(&self, name: &str) -> DriverResult<Account> {
        let response = self.client.get(self.account_url(name, "")).send().await?;
        let text = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn authenticate(&self, name: &str) -> DriverResult<()> {
        let response = self
            .client
            .post(self.account_url(name, "/authenticate"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn is_authenticated(&self, name: &str) -> bool {
        match self.authentication_status(name).await {
            Ok(status) => status.authenticated,
            Err(e) => {
                debug!("authentication status unavailable for {}: {}", name, e);
                false
            }
        }
    }

    async fn activate(&self, name: &str) -> DriverResult<()> {
        let response = self
            .client
            .post(self.account_url(name, "/activate"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_project(&self, name: &str) -> DriverResult<()> {
        let response = self
            .client
            .post(self.account_url(name, "/projects"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_projects(&self, name: &str) -> DriverResult<Vec<Project>> {
        let response = self
            .client
            .get(self.account_url(name, "/projects"))
            .send()
            .await?;
        let text = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
