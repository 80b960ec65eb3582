//! Engine and server configuration.
//!
//! [`EngineConfig`] carries the tunables the calculation itself
//! depends on; [`ServerConfig`] is read from the environment by the
//! binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunables for a calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Working hours of one FTE per month.
    #[serde(default = "default_agent_hours")]
    pub standard_agent_hours_per_month: f64,
    /// Absolute tolerance for the self-check recomputation.
    #[serde(default = "default_tolerance")]
    pub consistency_tolerance: f64,
    /// Attach the internal cost breakdown to results.
    #[serde(default)]
    pub include_breakdown: bool,
    #[serde(default)]
    pub internal_costs: InternalCostRates,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_agent_hours_per_month: default_agent_hours(),
            consistency_tolerance: default_tolerance(),
            include_breakdown: false,
            internal_costs: InternalCostRates::default(),
        }
    }
}

fn default_agent_hours() -> f64 {
    160.0
}

fn default_tolerance() -> f64 {
    0.01
}

/// SentraTech's own unit costs, used only for the margin breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalCostRates {
    /// Per automated call minute.
    pub speech_to_text_per_minute_usd: f64,
    /// Per automated call minute.
    pub text_to_speech_per_minute_usd: f64,
    /// Per automated minute, calls and interactions alike.
    pub language_model_per_minute_usd: f64,
    /// Per call minute, automated or not.
    pub telephony_per_minute_usd: f64,
    /// Platform cost per month, spread over the bundles sold that month.
    pub fixed_platform_monthly_usd: f64,
}

impl Default for InternalCostRates {
    fn default() -> Self {
        Self {
            speech_to_text_per_minute_usd: 0.006,
            text_to_speech_per_minute_usd: 0.015,
            language_model_per_minute_usd: 0.004,
            telephony_per_minute_usd: 0.0085,
            fixed_platform_monthly_usd: 500.0,
        }
    }
}

/// Settings for the HTTP binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// JSON country table; the built-in table is used when unset.
    pub country_table: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Reads `ROI_BIND_ADDR`, `ROI_COUNTRY_TABLE`,
    /// `ROI_AGENT_HOURS_PER_MONTH` and `ROI_INCLUDE_BREAKDOWN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("ROI_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let country_table = lookup("ROI_COUNTRY_TABLE").map(PathBuf::from);

        let mut engine = EngineConfig::default();
        if let Some(raw) = lookup("ROI_AGENT_HOURS_PER_MONTH") {
            let hours: f64 = raw
                .parse()
                .with_context(|| format!("ROI_AGENT_HOURS_PER_MONTH is not a number: {raw}"))?;
            anyhow::ensure!(
                hours.is_finite() && hours > 0.0,
                "ROI_AGENT_HOURS_PER_MONTH must be positive, got {hours}"
            );
            engine.standard_agent_hours_per_month = hours;
        }
        if let Some(raw) = lookup("ROI_INCLUDE_BREAKDOWN") {
            engine.include_breakdown = raw
                .parse()
                .with_context(|| format!("ROI_INCLUDE_BREAKDOWN must be true or false: {raw}"))?;
        }

        Ok(Self {
            bind_addr,
            country_table,
            engine,
        })
    }
}
