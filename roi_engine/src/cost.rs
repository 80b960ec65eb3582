//! Traditional BPO and SentraTech cost models.
//!
//! The traditional cost is always "minutes × BPO per-minute rate".
//! The SentraTech side answers one of two different questions
//! depending on the mode, so each is a separate [`PricingModel`]:
//!
//! * [`LaborPricing`]: what the residual human staffing costs after
//!   automation (`AGENT_COUNT`, `CALL_VOLUME`).
//! * [`BundlePricing`]: what the customer is charged for the bundle
//!   (`PER_BUNDLE`).
//!
//! The internal cost breakdown is computed beside the quote and never
//! feeds back into it.

use crate::config::{EngineConfig, InternalCostRates};
use crate::models::{CostBasis, CostBreakdown, CostUnit, Workload};
use crate::validation::{Pricing, ValidatedInput};

/// Calls and interactions in the reference bundle.
pub const BUNDLE_REFERENCE_VOLUME: f64 = 1000.0;

/// Prices SentraTech's side of the comparison.
///
/// Implementations must be thread-safe (`Send + Sync`) because batch
/// runs evaluate requests concurrently.
pub trait PricingModel: Send + Sync {
    fn basis(&self) -> CostBasis;
    fn unit(&self) -> CostUnit;
    /// SentraTech cost for one cost unit.
    fn sentra_cost(&self, input: &ValidatedInput, workload: &Workload) -> f64;
}

/// Residual human labor after automation.
pub struct LaborPricing {
    pub agent_hourly_rate_usd: f64,
    pub standard_agent_hours_per_month: f64,
}

impl PricingModel for LaborPricing {
    fn basis(&self) -> CostBasis {
        CostBasis::LaborCost
    }

    fn unit(&self) -> CostUnit {
        CostUnit::PerMonth
    }

    fn sentra_cost(&self, _input: &ValidatedInput, workload: &Workload) -> f64 {
        workload.fte_required * self.agent_hourly_rate_usd * self.standard_agent_hours_per_month
    }
}

/// Quoted bundle price, prorated by each channel's share of the
/// reference bundle's minutes.
pub struct BundlePricing {
    pub bundle_price_usd: f64,
}

impl PricingModel for BundlePricing {
    fn basis(&self) -> CostBasis {
        CostBasis::QuotedPrice
    }

    fn unit(&self) -> CostUnit {
        CostUnit::PerBundle
    }

    fn sentra_cost(&self, input: &ValidatedInput, _workload: &Workload) -> f64 {
        let shares = WorkloadShares::new(input.call_handle_minutes, input.interaction_handle_minutes);
        let call_cost =
            input.calls as f64 / BUNDLE_REFERENCE_VOLUME * self.bundle_price_usd * shares.call;
        let interaction_cost = input.interactions as f64 / BUNDLE_REFERENCE_VOLUME
            * self.bundle_price_usd
            * shares.interaction;
        call_cost + interaction_cost
    }
}

/// Fractions of the reference bundle's minutes spent on calls and on
/// interactions.  Computed from exact minute totals, never from
/// rounded percentages; the two always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadShares {
    pub call: f64,
    pub interaction: f64,
}

impl WorkloadShares {
    pub fn new(call_handle_minutes: f64, interaction_handle_minutes: f64) -> Self {
        let call_minutes = BUNDLE_REFERENCE_VOLUME * call_handle_minutes;
        let interaction_minutes = BUNDLE_REFERENCE_VOLUME * interaction_handle_minutes;
        let call = call_minutes / (call_minutes + interaction_minutes);
        Self {
            call,
            interaction: 1.0 - call,
        }
    }
}

/// Both sides of the comparison for one cost unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostComputation {
    pub traditional_monthly_cost_usd: f64,
    pub sentra_monthly_cost_usd: f64,
    pub basis: CostBasis,
    pub unit: CostUnit,
    pub breakdown: Option<CostBreakdown>,
}

/// Selects the pricing model for a validated request.
pub fn pricing_model(input: &ValidatedInput, config: &EngineConfig) -> Box<dyn PricingModel> {
    match input.pricing {
        Pricing::Labor {
            agent_hourly_rate_usd,
        } => Box::new(LaborPricing {
            agent_hourly_rate_usd,
            standard_agent_hours_per_month: config.standard_agent_hours_per_month,
        }),
        Pricing::Bundle {
            bundle_price_usd, ..
        } => Box::new(BundlePricing { bundle_price_usd }),
    }
}

/// Computes traditional and SentraTech cost for `input`.
pub fn compute_costs(
    input: &ValidatedInput,
    workload: &Workload,
    config: &EngineConfig,
) -> CostComputation {
    let model = pricing_model(input, config);
    let traditional_monthly_cost_usd = workload.total_minutes * input.bpo_per_minute_rate_usd;
    let sentra_monthly_cost_usd = model.sentra_cost(input, workload);

    let breakdown = if config.include_breakdown {
        internal_breakdown(input, workload, &config.internal_costs, sentra_monthly_cost_usd)
    } else {
        None
    };

    CostComputation {
        traditional_monthly_cost_usd,
        sentra_monthly_cost_usd,
        basis: model.basis(),
        unit: model.unit(),
        breakdown,
    }
}

/// SentraTech's cost to serve the request's monthly volume, against
/// the quoted price.  The fixed platform cost is spread evenly over
/// `bundles_per_month` bundles.
///
/// Only defined for quoted-price requests whose agent rate is known;
/// a labor-cost figure has no margin to report.
pub fn internal_breakdown(
    input: &ValidatedInput,
    workload: &Workload,
    rates: &InternalCostRates,
    quoted_usd: f64,
) -> Option<CostBreakdown> {
    let Pricing::Bundle {
        bundles_per_month,
        agent_hourly_rate_usd: Some(agent_rate),
        ..
    } = input.pricing
    else {
        return None;
    };

    let automated_call_minutes = workload.total_call_minutes * input.automation_fraction;
    let speech_to_text_usd = automated_call_minutes * rates.speech_to_text_per_minute_usd;
    let text_to_speech_usd = automated_call_minutes * rates.text_to_speech_per_minute_usd;
    let language_model_usd = workload.automated_minutes * rates.language_model_per_minute_usd;
    let telephony_usd = workload.total_call_minutes * rates.telephony_per_minute_usd;
    let amortized_fixed_usd = rates.fixed_platform_monthly_usd
        * reference_bundles(input.calls, input.interactions)
        / bundles_per_month;
    let escalation_labor_usd = workload.human_minutes / 60.0 * agent_rate;

    let total_usd = speech_to_text_usd
        + text_to_speech_usd
        + language_model_usd
        + telephony_usd
        + amortized_fixed_usd
        + escalation_labor_usd;

    Some(CostBreakdown {
        speech_to_text_usd,
        text_to_speech_usd,
        language_model_usd,
        telephony_usd,
        amortized_fixed_usd,
        escalation_labor_usd,
        total_usd,
        margin_usd: quoted_usd - total_usd,
    })
}

/// Reference bundles the monthly volume fills; the busier channel
/// decides.
pub fn reference_bundles(calls: u64, interactions: u64) -> f64 {
    calls.max(interactions) as f64 / BUNDLE_REFERENCE_VOLUME
}

/// Whole reference bundles covering the monthly volume.
pub fn bundles_needed(input: &ValidatedInput) -> u64 {
    reference_bundles(input.calls, input.interactions).ceil() as u64
}
