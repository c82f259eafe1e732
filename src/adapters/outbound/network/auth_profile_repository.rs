use super::backend_client::BackendClient;
use crate::audit::domain::{Profile, Role};
use crate::ports::outbound::ProfileRepository;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// AuthProfileRepository adapter resolving the session user and its profile
///
/// The session token identifies the user (`/auth/v1/user`); login and role
/// come from the `profiles` table.
pub struct AuthProfileRepository {
    client: BackendClient,
}

impl AuthProfileRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn fetch_user(&self) -> Result<Option<AuthUser>> {
        let response = self.client.request(Method::GET, "/auth/v1/user").send().await?;
        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::debug!(status = response.status().as_u16(), "session token rejected");
            return Ok(None);
        }
        let response = BackendClient::ensure_success(response, "fetch session user").await?;
        Ok(Some(response.json().await?))
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        let path = format!(
            "/rest/v1/profiles?select=login,role&id=eq.{}",
            urlencoding::encode(user_id)
        );
        let response = self.client.request(Method::GET, &path).send().await?;
        let response = BackendClient::ensure_success(response, "fetch profile").await?;

        let rows: Vec<ProfileRow> = response.json().await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl ProfileRepository for AuthProfileRepository {
    async fn current_profile(&self) -> Result<Option<Profile>> {
        if !self.client.has_session() {
            return Ok(None);
        }
        let Some(user) = self.fetch_user().await? else {
            return Ok(None);
        };

        let row = self.fetch_profile(&user.id).await?;
        Ok(Some(build_profile(&user, row)))
    }
}

/// Profiles without a row fall back to the e-mail's local part and the analyst role
fn build_profile(user: &AuthUser, row: Option<ProfileRow>) -> Profile {
    let (login, role) = row
        .map(|r| (r.login, r.role))
        .unwrap_or((None, None));

    let login = login
        .filter(|l| !l.trim().is_empty())
        .or_else(|| {
            user.email
                .as_deref()
                .and_then(|email| email.split('@').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| user.id.clone())
        .trim()
        .to_uppercase();

    let role = match role.as_deref().map(str::trim) {
        Some("admin") => Role::Admin,
        _ => Role::Analyst,
    };

    Profile::new(login, role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: "uuid-1".to_string(),
            email: Some("jsilva@example.com".to_string()),
        }
    }

    #[test]
    fn test_profile_from_row() {
        let profile = build_profile(
            &user(),
            Some(ProfileRow {
                login: Some("ADMIN01".to_string()),
                role: Some("admin".to_string()),
            }),
        );
        assert_eq!(profile, Profile::new("ADMIN01", Role::Admin));
    }

    #[test]
    fn test_profile_without_row_uses_email() {
        let profile = build_profile(&user(), None);
        assert_eq!(profile, Profile::new("JSILVA", Role::Analyst));
    }

    #[test]
    fn test_unknown_role_is_analyst() {
        let profile = build_profile(
            &user(),
            Some(ProfileRow {
                login: None,
                role: Some("superuser".to_string()),
            }),
        );
        assert_eq!(profile.role, Role::Analyst);
        assert_eq!(profile.login, "JSILVA");
    }

    #[tokio::test]
    async fn test_no_token_means_no_profile() {
        let client = BackendClient::new(crate::adapters::outbound::network::BackendSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "key".to_string(),
            access_token: None,
        })
        .unwrap();

        let profile = AuthProfileRepository::new(client).current_profile().await.unwrap();
        assert!(profile.is_none());
    }
}
