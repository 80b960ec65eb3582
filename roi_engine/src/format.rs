//! Display formatting for results.
//!
//! Presentation only: nothing here feeds back into a calculation.
//! Currency is truncated toward zero so a displayed amount never
//! exceeds the true one; percentages round half up.

use crate::models::{CalculationResult, CostUnit};
use serde::{Deserialize, Serialize};

/// `$825`, `$4.9K`, `$1.2M`.  Negative amounts get a leading `-`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }
    let abs = amount.abs();
    let (body, nonzero) = if abs < 1_000.0 {
        let dollars = abs.trunc() as u64;
        (format!("${dollars}"), dollars != 0)
    } else if abs < 1_000_000.0 {
        let tenths = (abs / 100.0).trunc() as u64;
        (format!("${}.{}K", tenths / 10, tenths % 10), true)
    } else {
        let tenths = (abs / 100_000.0).trunc() as u64;
        (format!("${}.{}M", tenths / 10, tenths % 10), true)
    };
    if amount < 0.0 && nonzero {
        format!("-{body}")
    } else {
        body
    }
}

/// One decimal place, rounded half up: `215.1%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = (value * 10.0 + 0.5).floor() / 10.0;
    format!("{rounded:.1}%")
}

fn format_payback(months: Option<f64>) -> String {
    match months {
        None => "No payback".to_string(),
        Some(m) if m == 0.0 => "Immediate".to_string(),
        Some(m) => format!("{:.1} months", (m * 10.0 + 0.5).floor() / 10.0),
    }
}

/// Display strings for the headline figures of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySummary {
    pub cost_unit: String,
    pub traditional_cost: String,
    pub sentra_cost: String,
    pub savings: String,
    pub annual_savings: String,
    pub roi: String,
    pub roi_over_period: String,
    pub cost_reduction: String,
    pub payback: String,
}

impl DisplaySummary {
    pub fn from_result(result: &CalculationResult) -> Self {
        let cost_unit = match result.cost_unit {
            CostUnit::PerMonth => "per month",
            CostUnit::PerBundle => "per bundle",
        };
        Self {
            cost_unit: cost_unit.to_string(),
            traditional_cost: format_currency(result.traditional_monthly_cost_usd),
            sentra_cost: format_currency(result.sentra_monthly_cost_usd),
            savings: format_currency(result.monthly_savings_usd),
            annual_savings: format_currency(result.annual_savings_usd),
            roi: format_percentage(result.roi_percent),
            roi_over_period: format_percentage(result.roi_over_period_percent),
            cost_reduction: format_percentage(result.cost_reduction_percent),
            payback: format_payback(result.payback_months),
        }
    }
}
