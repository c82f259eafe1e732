use crate::application::dto::AccountRequest;
use crate::audit::domain::{Login, NewAccount};
use crate::ports::outbound::{AccountProvisioner, ProfileRepository};
use crate::shared::error::AuditError;
use crate::shared::Result;

/// ProvisionAccountUseCase - Admin-only account creation
///
/// # Type Parameters
/// * `PRF` - ProfileRepository implementation (caller identity)
/// * `AP` - AccountProvisioner implementation
pub struct ProvisionAccountUseCase<PRF, AP> {
    profile_repository: PRF,
    account_provisioner: AP,
}

impl<PRF, AP> ProvisionAccountUseCase<PRF, AP>
where
    PRF: ProfileRepository,
    AP: AccountProvisioner,
{
    pub fn new(profile_repository: PRF, account_provisioner: AP) -> Self {
        Self {
            profile_repository,
            account_provisioner,
        }
    }

    /// Creates the account when the caller is an administrator
    ///
    /// # Returns
    /// The provider's confirmation message
    ///
    /// # Errors
    /// - `AuditError::NotAuthenticated` without a session
    /// - `AuditError::NotAuthorized` when the caller is not an admin
    /// - `AuditError::Validation` for an empty login or password
    /// - `AuditError::ProvisioningRejected` when the provider refuses
    ///
    /// Nothing is sent to the provider unless every check passes.
    pub async fn execute(&self, request: AccountRequest) -> Result<String> {
        let caller = self
            .profile_repository
            .current_profile()
            .await?
            .ok_or(AuditError::NotAuthenticated)?;

        if !caller.is_admin() {
            return Err(AuditError::NotAuthorized {
                action: "Creating accounts".to_string(),
                role: caller.role.to_string(),
            }
            .into());
        }

        let login = Login::new(&request.login)?;
        if request.password.is_empty() {
            return Err(AuditError::Validation {
                message: "Password cannot be empty".to_string(),
            }
            .into());
        }

        let account = NewAccount {
            login,
            password: request.password,
            role: request.role.unwrap_or_default(),
        };

        tracing::debug!(login = %account.login, role = %account.role, caller = %caller.login, "provisioning account");
        self.account_provisioner.create_account(&account).await
    }
}
