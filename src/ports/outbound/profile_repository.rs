use crate::audit::domain::Profile;
use crate::shared::Result;
use async_trait::async_trait;

/// ProfileRepository port for resolving the signed-in account
///
/// The session itself is owned by the hosting platform; this port only
/// answers "who is calling, and with which role".
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the caller's profile, or `None` when there is no session
    ///
    /// # Errors
    /// Returns an error if the identity provider cannot be reached
    async fn current_profile(&self) -> Result<Option<Profile>>;
}
