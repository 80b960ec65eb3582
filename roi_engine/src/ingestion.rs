//! Mapping results onto the ingestion endpoint's record.
//!
//! The endpoint stores ROI as a fraction.  The engine keeps ROI as a
//! percentage everywhere else, so [`IngestionRecord::from_result`] is
//! the one place the value is divided by 100.  Every other field is a
//! rename.

use crate::error::IngestionError;
use crate::models::CalculationResult;
use crate::validation::ValidatedInput;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Flattened record accepted by the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionRecord {
    pub country: String,
    pub call_volume: u64,
    pub interaction_volume: u64,
    /// Traditional BPO cost.
    pub bpo_spending: f64,
    /// SentraTech cost.
    pub sentratech_spending: f64,
    pub monthly_savings: f64,
    /// ROI as a fraction (`2.15` for 215%).
    pub roi: f64,
    /// Cost reduction as a percentage.
    pub cost_reduction: f64,
    pub email: String,
}

impl IngestionRecord {
    pub fn from_result(
        result: &CalculationResult,
        input: &ValidatedInput,
        email: &str,
    ) -> Result<Self, IngestionError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(IngestionError::InvalidEmail(email.to_string()));
        }
        Ok(Self {
            country: result.country.clone(),
            call_volume: input.calls,
            interaction_volume: input.interactions,
            bpo_spending: result.traditional_monthly_cost_usd,
            sentratech_spending: result.sentra_monthly_cost_usd,
            monthly_savings: result.monthly_savings_usd,
            roi: result.roi_percent / 100.0,
            cost_reduction: result.cost_reduction_percent,
            email: email.to_string(),
        })
    }
}

/// The external collaborator that persists submissions.
///
/// Any de-duplication state lives in the sink, never in the engine.
pub trait IngestionSink: Send + Sync {
    fn submit(&self, record: &IngestionRecord) -> Result<()>;
}

/// A sink that only logs the record.
pub struct LogSink;

impl IngestionSink for LogSink {
    fn submit(&self, record: &IngestionRecord) -> Result<()> {
        info!(
            country = %record.country,
            call_volume = record.call_volume,
            interaction_volume = record.interaction_volume,
            monthly_savings = record.monthly_savings,
            roi = record.roi,
            "ROI submission received"
        );
        Ok(())
    }
}
