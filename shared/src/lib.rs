//! Shared types and models for the back office
//!
//! This crate contains the domain vocabulary shared between the backend and
//! the browser (via WASM): models, status tables, board partitioning, list
//! filtering and the aggregations behind the dashboard and finance views.

pub mod aggregation;
pub mod board;
pub mod models;
pub mod order_number;
pub mod palette;
pub mod query;
pub mod status;
pub mod types;
pub mod validation;

pub use models::*;
pub use status::{label_of, StatusFlow, StatusToken};
pub use types::*;
pub use validation::ValidationIssue;
