use super::backend_client::BackendClient;
use crate::audit::domain::NewAccount;
use crate::ports::outbound::AccountProvisioner;
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CreateUserBody<'a> {
    login: &'a str,
    password: &'a str,
    role: &'a str,
}

/// `{success: true, message}` or `{success: false, error}`
#[derive(Debug, Deserialize)]
struct CreateUserReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl CreateUserReply {
    fn into_result(self, login: &str) -> Result<String> {
        if self.success {
            Ok(self
                .message
                .unwrap_or_else(|| format!("User {} created successfully", login)))
        } else {
            Err(AuditError::ProvisioningRejected {
                message: self
                    .error
                    .unwrap_or_else(|| "The provisioning function gave no reason".to_string()),
            }
            .into())
        }
    }
}

/// FunctionAccountProvisioner adapter calling the `create-user` function
///
/// The function re-checks the caller's admin role server-side with the
/// caller's bearer token.
pub struct FunctionAccountProvisioner {
    client: BackendClient,
}

impl FunctionAccountProvisioner {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountProvisioner for FunctionAccountProvisioner {
    async fn create_account(&self, account: &NewAccount) -> Result<String> {
        let body = CreateUserBody {
            login: account.login.as_str(),
            password: &account.password,
            role: account.role.as_str(),
        };

        let response = self
            .client
            .request(Method::POST, "/functions/v1/create-user")
            .json(&body)
            .send()
            .await?;

        // rejections come back as 400 with a JSON reply
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<CreateUserReply>(&text) {
            Ok(reply) => reply.into_result(account.login.as_str()),
            Err(_) => Err(AuditError::BackendError {
                operation: "create user".to_string(),
                status: status.as_u16(),
                details: text,
            }
            .into()),
        }
    }
}
