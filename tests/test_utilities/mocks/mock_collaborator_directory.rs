use audit_portal::prelude::*;
use std::collections::HashMap;

/// Mock CollaboratorDirectory backed by a map
#[derive(Default)]
pub struct MockCollaboratorDirectory {
    entries: HashMap<String, Collaborator>,
}

impl MockCollaboratorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collaborator(mut self, login: &str, name: &str, email: Option<&str>) -> Self {
        self.entries.insert(
            login.to_uppercase(),
            Collaborator::new(name, email.map(str::to_string)),
        );
        self
    }
}

impl CollaboratorDirectory for MockCollaboratorDirectory {
    fn lookup(&self, login: &str) -> Option<Collaborator> {
        self.entries.get(login).cloned()
    }
}
