use crate::audit::domain::Collaborator;

/// CollaboratorDirectory port mapping operator logins to people
pub trait CollaboratorDirectory {
    /// Looks up an upper-cased operator login
    fn lookup(&self, login: &str) -> Option<Collaborator>;
}
