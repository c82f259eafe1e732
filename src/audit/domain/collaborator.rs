use serde::{Deserialize, Serialize};

/// Directory entry for an operator: display name and optional e-mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Collaborator {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email,
        }
    }
}
