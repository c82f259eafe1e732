//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of domain data for queries.

pub mod dashboard_read_model;
pub mod offender_report;
pub mod worklist_view;

pub use dashboard_read_model::{DashboardKpis, DashboardReadModel};
pub use offender_report::{OffenderReport, OffenderRow};
pub use worklist_view::WorklistView;
