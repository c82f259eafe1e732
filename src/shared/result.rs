/// Result alias used by use cases, ports and adapters.
///
/// Typed failures are raised as `AuditError` and travel inside `anyhow::Error`,
/// so callers can still `downcast_ref::<AuditError>()` when they need to branch.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
