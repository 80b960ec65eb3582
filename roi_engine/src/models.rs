//! Data models for the ROI engine.
//!
//! The `models` module defines the serialisable request and result
//! types that flow through the calculation pipeline.  Requests arrive
//! as a [`CalculationInput`] built from form data; the engine hands
//! back a fully derived [`CalculationResult`] that is never edited
//! after construction.

use serde::{Deserialize, Serialize};

/// Which question a calculation answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMode {
    /// The customer states how many agents they staff today.
    AgentCount,
    /// Staffing is derived from call volume, unless the customer also
    /// supplies a manual agent count.
    CallVolume,
    /// SentraTech's quoted bundle price is compared against BPO cost.
    PerBundle,
}

impl CalculationMode {
    /// Automation fraction assumed when the request leaves it out.
    pub fn default_automation_fraction(self) -> f64 {
        match self {
            CalculationMode::AgentCount | CalculationMode::CallVolume => 0.60,
            CalculationMode::PerBundle => 0.70,
        }
    }

    /// True for the modes whose SentraTech cost is residual human labor.
    pub fn is_labor_driven(self) -> bool {
        !matches!(self, CalculationMode::PerBundle)
    }

    pub fn cost_unit(self) -> CostUnit {
        match self {
            CalculationMode::PerBundle => CostUnit::PerBundle,
            _ => CostUnit::PerMonth,
        }
    }

    pub fn cost_basis(self) -> CostBasis {
        match self {
            CalculationMode::PerBundle => CostBasis::QuotedPrice,
            _ => CostBasis::LaborCost,
        }
    }
}

/// The unit SentraTech's side is priced in.  Cost figures always
/// cover the request's monthly volume, whichever unit the price uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostUnit {
    PerMonth,
    PerBundle,
}

/// Which SentraTech cost model produced `sentra_monthly_cost_usd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBasis {
    /// Residual human labor after automation: what it costs to staff.
    LaborCost,
    /// The price charged to the customer for the bundle.
    QuotedPrice,
}

/// A calculation request as submitted by the form layer.
///
/// Optional fields fall back to documented defaults during
/// validation; see [`crate::validation::ValidatedInput`] for the
/// normalised form the rest of the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Monthly call volume.
    pub calls: u64,
    /// Monthly non-voice interaction volume (chat, email, tickets).
    pub interactions: u64,
    /// Average handle time per call in minutes.  Defaults to 8.
    #[serde(default)]
    pub call_handle_minutes: Option<f64>,
    /// Average handle time per interaction in minutes.  Defaults to 5.
    #[serde(default)]
    pub interaction_handle_minutes: Option<f64>,
    /// Share of workload minutes handled without a human, in `[0, 1]`.
    /// Defaults to [`CalculationMode::default_automation_fraction`].
    #[serde(default)]
    pub automation_fraction: Option<f64>,
    /// Country name as listed in the baseline table.
    pub country: String,
    pub mode: CalculationMode,
    /// Agent headcount; required for `AGENT_COUNT`, optional manual
    /// override for `CALL_VOLUME`, ignored for `PER_BUNDLE`.
    #[serde(default)]
    pub agent_count: Option<u32>,
    /// Quoted price per 1,000-call-equivalent bundle.  Required for
    /// `PER_BUNDLE`.
    #[serde(default)]
    pub bundle_price_usd: Option<f64>,
    /// Bundles the fixed platform cost is spread over in the internal
    /// breakdown.  Defaults to the bundles the request's volume fills.
    #[serde(default)]
    pub bundles_per_month: Option<f64>,
    /// One-time onboarding cost.  Defaults to 0.
    #[serde(default)]
    pub implementation_cost_usd: Option<f64>,
    /// Defaults to 12.
    #[serde(default)]
    pub analysis_period_months: Option<u32>,
    /// Supersedes the country's loaded agent hourly rate.
    #[serde(default)]
    pub agent_hourly_rate_usd: Option<f64>,
    /// Supersedes the country's BPO per-minute rate.
    #[serde(default)]
    pub bpo_per_minute_rate_usd: Option<f64>,
}

impl CalculationInput {
    /// A request with every optional field left to its default.
    pub fn new(mode: CalculationMode, country: impl Into<String>, calls: u64, interactions: u64) -> Self {
        Self {
            calls,
            interactions,
            call_handle_minutes: None,
            interaction_handle_minutes: None,
            automation_fraction: None,
            country: country.into(),
            mode,
            agent_count: None,
            bundle_price_usd: None,
            bundles_per_month: None,
            implementation_cost_usd: None,
            analysis_period_months: None,
            agent_hourly_rate_usd: None,
            bpo_per_minute_rate_usd: None,
        }
    }

    pub fn with_handle_minutes(mut self, call: f64, interaction: f64) -> Self {
        self.call_handle_minutes = Some(call);
        self.interaction_handle_minutes = Some(interaction);
        self
    }

    pub fn with_automation_fraction(mut self, fraction: f64) -> Self {
        self.automation_fraction = Some(fraction);
        self
    }

    pub fn with_agent_count(mut self, agents: u32) -> Self {
        self.agent_count = Some(agents);
        self
    }

    pub fn with_bundle_price(mut self, price_usd: f64) -> Self {
        self.bundle_price_usd = Some(price_usd);
        self
    }

    pub fn with_bundles_per_month(mut self, bundles: f64) -> Self {
        self.bundles_per_month = Some(bundles);
        self
    }

    pub fn with_implementation_cost(mut self, cost_usd: f64) -> Self {
        self.implementation_cost_usd = Some(cost_usd);
        self
    }

    pub fn with_analysis_period(mut self, months: u32) -> Self {
        self.analysis_period_months = Some(months);
        self
    }

    pub fn with_agent_hourly_rate(mut self, rate_usd: f64) -> Self {
        self.agent_hourly_rate_usd = Some(rate_usd);
        self
    }

    pub fn with_bpo_rate(mut self, rate_usd: f64) -> Self {
        self.bpo_per_minute_rate_usd = Some(rate_usd);
        self
    }
}

/// Where a workload's FTE figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FteSource {
    /// Derived from human minutes and standard agent hours.
    Derived,
    /// Echoes an agent count supplied by the caller.
    Supplied,
}

/// Workload minutes and the human/automated split.  Unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub total_call_minutes: f64,
    pub total_interaction_minutes: f64,
    pub total_minutes: f64,
    pub human_minutes: f64,
    pub automated_minutes: f64,
    pub fte_required: f64,
    pub fte_source: FteSource,
}

/// SentraTech's internal cost to serve one cost unit.
///
/// Administrative visibility only; it never feeds the quoted price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub speech_to_text_usd: f64,
    pub text_to_speech_usd: f64,
    pub language_model_usd: f64,
    pub telephony_usd: f64,
    pub amortized_fixed_usd: f64,
    pub escalation_labor_usd: f64,
    pub total_usd: f64,
    /// Quoted SentraTech cost minus `total_usd`.
    pub margin_usd: f64,
}

/// One month of the cumulative savings series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-based month index.
    pub month: u32,
    /// Savings accumulated through this month, net of the one-time
    /// implementation cost.
    pub cumulative_savings_usd: f64,
    /// Recurring savings for this month.
    pub monthly_savings_usd: f64,
}

/// The fully derived outcome of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub mode: CalculationMode,
    /// Canonical country name from the baseline table.
    pub country: String,
    pub cost_unit: CostUnit,
    pub cost_basis: CostBasis,

    pub total_minutes: f64,
    pub human_minutes: f64,
    pub fte_required: f64,

    pub traditional_monthly_cost_usd: f64,
    pub sentra_monthly_cost_usd: f64,

    /// Traditional minus SentraTech, per calendar month.
    pub monthly_savings_usd: f64,
    pub annual_savings_usd: f64,
    /// Savings as a percentage of the SentraTech cost.
    pub roi_percent: f64,
    /// Net benefit over the analysis period as a percentage of total
    /// cost over the same period, implementation included.
    pub roi_over_period_percent: f64,
    pub analysis_period_months: u32,
    pub cost_reduction_percent: f64,
    /// `None` when there is no payback (savings ≤ 0).
    pub payback_months: Option<f64>,
    pub bundles_needed: u64,

    pub is_profitable: bool,
    pub is_cost_increase: bool,

    pub projection: Vec<ProjectionPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,
}
