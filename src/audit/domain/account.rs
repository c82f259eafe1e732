use crate::shared::error::AuditError;
use serde::{Deserialize, Serialize};

/// Maximum length for an operator login
const MAX_LOGIN_LENGTH: usize = 64;

/// NewType wrapper for an operator login.
///
/// Logins are case-insensitive in practice, so they are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Login(String);

impl Login {
    pub fn new(raw: &str) -> Result<Self, AuditError> {
        let login = raw.trim().to_uppercase();

        if login.is_empty() {
            return Err(AuditError::Validation {
                message: "Login cannot be empty".to_string(),
            });
        }

        if login.len() > MAX_LOGIN_LENGTH {
            return Err(AuditError::Validation {
                message: format!(
                    "Login is too long ({} bytes). Maximum allowed: {} bytes",
                    login.len(),
                    MAX_LOGIN_LENGTH
                ),
            });
        }

        // Logins double as the local part of an e-mail address
        if !login
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '_' || c == '-')
        {
            return Err(AuditError::Validation {
                message: "Login contains invalid characters. Only letters, digits, dots, hyphens and underscores are allowed.".to_string(),
            });
        }

        Ok(Self(login))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account role; only admins may provision new accounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Analyst,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Analyst => "analyst",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analyst" => Ok(Role::Analyst),
            "admin" => Ok(Role::Admin),
            _ => Err(format!(
                "Invalid role: {}. Please specify 'analyst' or 'admin'",
                s
            )),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile of a signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub role: Role,
}

impl Profile {
    pub fn new(login: impl Into<String>, role: Role) -> Self {
        Self {
            login: login.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account to be created by an administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub login: Login,
    pub password: String,
    pub role: Role,
}
