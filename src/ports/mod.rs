/// Ports module defining interfaces for hexagonal architecture
///
/// The application drives everything from the CLI, so only outbound (driven)
/// ports exist: the backend stores, the spreadsheet source and the console.
pub mod outbound;
