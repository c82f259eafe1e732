use crate::shared::error::AuditError;
use crate::shared::Result;
use reqwest::{Method, RequestBuilder, Response};
use std::time::Duration;

/// Connection settings of the hosted backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Project URL, e.g. `https://xyz.example.co`
    pub base_url: String,
    /// Public (anonymous) API key
    pub api_key: String,
    /// Session token of the signed-in user, if any
    pub access_token: Option<String>,
}

/// BackendClient - Shared HTTP plumbing for the hosted backend adapters
///
/// Every request carries the API key; the bearer token is the user's
/// session token when there is one, the API key otherwise.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl BackendClient {
    pub fn new(settings: BackendSettings) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("audit-portal/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
            access_token: settings.access_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.access_token.is_some()
    }

    /// Absolute URL for a path such as `/rest/v1/profiles`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
    }

    /// Turns a non-2xx response into `AuditError::BackendError`
    pub async fn ensure_success(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let details = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        tracing::debug!(operation, status = status.as_u16(), %details, "backend request failed");

        Err(AuditError::BackendError {
            operation: operation.to_string(),
            status: status.as_u16(),
            details,
        }
        .into())
    }
}
