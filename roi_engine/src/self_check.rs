//! Internal consistency check on finished results.
//!
//! Every derived field is recomputed from the result's own cost
//! figures with the defining formulas written out here, independently
//! of the code that produced them.  A result that disagrees with
//! itself is never handed out.

use crate::error::ConsistencyError;
use crate::models::CalculationResult;

fn check(field: &'static str, stored: f64, recomputed: f64, tolerance: f64) -> Result<(), ConsistencyError> {
    // NaN on either side fails the comparison.  Above roughly 1e13 a
    // cent is finer than f64 resolution, so allow a few ulps there.
    let resolution = recomputed.abs() * f64::EPSILON * 64.0;
    if (stored - recomputed).abs() <= tolerance.max(resolution) {
        Ok(())
    } else {
        Err(ConsistencyError {
            field,
            stored,
            recomputed,
        })
    }
}

fn check_flag(field: &'static str, stored: bool, recomputed: bool) -> Result<(), ConsistencyError> {
    if stored == recomputed {
        Ok(())
    } else {
        Err(ConsistencyError {
            field,
            stored: f64::from(u8::from(stored)),
            recomputed: f64::from(u8::from(recomputed)),
        })
    }
}

/// Verifies `result` within an absolute `tolerance`.
pub fn verify(result: &CalculationResult, tolerance: f64) -> Result<(), ConsistencyError> {
    let traditional = result.traditional_monthly_cost_usd;
    let sentra = result.sentra_monthly_cost_usd;
    let savings = traditional - sentra;

    check("monthly_savings_usd", result.monthly_savings_usd, savings, tolerance)?;

    let cost_reduction = if traditional > 0.0 {
        savings / traditional * 100.0
    } else {
        0.0
    };
    check(
        "cost_reduction_percent",
        result.cost_reduction_percent,
        cost_reduction,
        tolerance,
    )?;

    let roi = if sentra > 0.0 { savings / sentra * 100.0 } else { 0.0 };
    check("roi_percent", result.roi_percent, roi, tolerance)?;

    check(
        "annual_savings_usd",
        result.annual_savings_usd,
        savings * 12.0,
        tolerance,
    )?;

    // Each projected month adds exactly one month of savings.
    let mut previous: Option<f64> = None;
    for point in &result.projection {
        check(
            "projection.monthly_savings_usd",
            point.monthly_savings_usd,
            savings,
            tolerance,
        )?;
        if let Some(previous) = previous {
            check(
                "projection.cumulative_savings_usd",
                point.cumulative_savings_usd,
                previous + savings,
                tolerance,
            )?;
        }
        previous = Some(point.cumulative_savings_usd);
    }

    check_flag("is_profitable", result.is_profitable, savings > 0.0)?;
    check_flag("is_cost_increase", result.is_cost_increase, savings < 0.0)?;
    Ok(())
}
