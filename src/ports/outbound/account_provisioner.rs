use crate::audit::domain::NewAccount;
use crate::shared::Result;
use async_trait::async_trait;

/// AccountProvisioner port for the privileged account-creation call
#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    /// Creates an account and returns the provider's confirmation message
    ///
    /// # Errors
    /// Returns `AuditError::ProvisioningRejected` when the provider refuses the
    /// request (duplicate login, weak password, caller not admin, ...)
    async fn create_account(&self, account: &NewAccount) -> Result<String>;
}
