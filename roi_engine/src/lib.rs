//! ROI Engine library crate.
//!
//! This crate compares what a contact-center workload costs with a
//! traditional BPO vendor against SentraTech's AI-automation offering,
//! and derives savings, cost reduction, ROI and payback from the two.
//! Applications call [`engine::calculate`] directly or embed the HTTP
//! surface via [`api::build_router`].

pub mod api;
pub mod baseline;
pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod format;
pub mod ingestion;
pub mod models;
pub mod projection;
pub mod savings;
pub mod self_check;
pub mod validation;
pub mod workload;

pub use baseline::{CountryBaseline, CountryBaselineTable};
pub use config::EngineConfig;
pub use engine::{calculate, calculate_batch};
pub use error::{ConsistencyError, EngineError, ValidationError, ValidationErrors};
pub use models::{CalculationInput, CalculationMode, CalculationResult};
