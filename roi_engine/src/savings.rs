//! Savings, cost reduction, ROI and payback.
//!
//! Two ROI figures are exposed and neither replaces the other:
//! `roi_percent` compares one month's savings to that month's
//! SentraTech cost, while `roi_over_period_percent` nets the whole analysis
//! period including the one-time implementation cost.

use crate::cost::CostComputation;
use serde::{Deserialize, Serialize};

/// Everything derived from the two cost figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsResult {
    pub monthly_savings_usd: f64,
    pub annual_savings_usd: f64,
    pub cost_reduction_percent: f64,
    pub roi_percent: f64,
    pub roi_over_period_percent: f64,
    pub payback_months: Option<f64>,
    pub implementation_cost_usd: f64,
    pub is_profitable: bool,
    pub is_cost_increase: bool,
}

/// Derives savings figures from `costs`, which cover one calendar
/// month in every mode.
pub fn compute(
    costs: &CostComputation,
    implementation_cost_usd: f64,
    analysis_period_months: u32,
) -> SavingsResult {
    let traditional = costs.traditional_monthly_cost_usd;
    let sentra = costs.sentra_monthly_cost_usd;
    let monthly_savings_usd = traditional - sentra;

    let cost_reduction_percent = if traditional > 0.0 {
        monthly_savings_usd / traditional * 100.0
    } else {
        0.0
    };
    let roi_percent = if sentra > 0.0 {
        monthly_savings_usd / sentra * 100.0
    } else {
        0.0
    };

    let annual_savings_usd = monthly_savings_usd * 12.0;

    let payback_months = if monthly_savings_usd <= 0.0 {
        None
    } else if implementation_cost_usd == 0.0 {
        Some(0.0)
    } else {
        Some(implementation_cost_usd / monthly_savings_usd)
    };

    let months = f64::from(analysis_period_months);
    let total_costs = implementation_cost_usd + sentra * months;
    let total_benefits = traditional * months;
    let roi_over_period_percent = if total_costs > 0.0 {
        (total_benefits - total_costs) / total_costs * 100.0
    } else {
        0.0
    };

    SavingsResult {
        monthly_savings_usd,
        annual_savings_usd,
        cost_reduction_percent,
        roi_percent,
        roi_over_period_percent,
        payback_months,
        implementation_cost_usd,
        is_profitable: monthly_savings_usd > 0.0,
        is_cost_increase: monthly_savings_usd < 0.0,
    }
}
