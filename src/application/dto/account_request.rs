use crate::audit::domain::Role;

/// AccountRequest - Input of the admin-only account creation
#[derive(Debug, Clone)]
pub struct AccountRequest {
    pub login: String,
    pub password: String,
    /// Defaults to analyst when absent
    pub role: Option<Role>,
}

impl AccountRequest {
    pub fn new(login: impl Into<String>, password: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            role,
        }
    }
}
