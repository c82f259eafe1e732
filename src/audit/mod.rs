//! Incident audit domain: records, audit overlays, import mapping and aggregations
pub mod domain;
pub mod policies;
pub mod services;
