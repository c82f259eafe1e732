use crate::audit::domain::{NewAccount, Profile, Role};
use crate::ports::outbound::{AccountProvisioner, ProfileRepository};
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// An account known to the local directory
///
/// Passwords are never kept: only the login and role are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    pub login: String,
    pub role: Role,
}

/// InMemoryAccountDirectory adapter for sessions and account creation
///
/// Implements both ProfileRepository (the signed-in caller) and
/// AccountProvisioner (creating accounts). Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountDirectory {
    accounts: Arc<DashMap<String, Role>>,
    session: Arc<RwLock<Option<String>>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory with one account already signed in
    pub fn signed_in(login: &str, role: Role) -> Self {
        let directory = Self::new();
        directory.add_account(login, role);
        directory.sign_in(login);
        directory
    }

    pub fn from_accounts(accounts: Vec<StoredAccount>) -> Self {
        let directory = Self::new();
        for account in accounts {
            directory.add_account(&account.login, account.role);
        }
        directory
    }

    pub fn add_account(&self, login: &str, role: Role) {
        self.accounts.insert(login.trim().to_uppercase(), role);
    }

    /// Opens a session for a known login; unknown logins leave no session
    pub fn sign_in(&self, login: &str) {
        let login = login.trim().to_uppercase();
        let known = self.accounts.contains_key(&login);
        if let Ok(mut session) = self.session.write() {
            *session = known.then_some(login);
        }
    }

    pub fn accounts(&self) -> Vec<StoredAccount> {
        let mut accounts: Vec<StoredAccount> = self
            .accounts
            .iter()
            .map(|entry| StoredAccount {
                login: entry.key().clone(),
                role: *entry.value(),
            })
            .collect();
        accounts.sort_by(|a, b| a.login.cmp(&b.login));
        accounts
    }
}

#[async_trait]
impl ProfileRepository for InMemoryAccountDirectory {
    async fn current_profile(&self) -> Result<Option<Profile>> {
        let login = self
            .session
            .read()
            .map_err(|_| anyhow::anyhow!("Session state is unavailable"))?
            .clone();

        Ok(login.and_then(|login| {
            self.accounts
                .get(&login)
                .map(|role| Profile::new(login.clone(), *role))
        }))
    }
}

#[async_trait]
impl AccountProvisioner for InMemoryAccountDirectory {
    async fn create_account(&self, account: &NewAccount) -> Result<String> {
        let login = account.login.as_str().to_string();
        if self.accounts.contains_key(&login) {
            return Err(AuditError::ProvisioningRejected {
                message: format!("User {} already exists", login),
            }
            .into());
        }

        self.accounts.insert(login.clone(), account.role);
        Ok(format!("User {} created successfully", login))
    }
}
