//! ROI computation engine.
//!
//! The `engine` module turns a [`CalculationInput`] into a
//! [`CalculationResult`] by running validation, workload resolution,
//! costing, savings, projection and the self-check in order.  Every
//! step is a pure function of its inputs; the country table is only
//! read.  [`calculate_batch`] uses [`rayon`] to evaluate independent
//! requests across CPU cores.

use crate::baseline::CountryBaselineTable;
use crate::config::EngineConfig;
use crate::cost::{bundles_needed, compute_costs};
use crate::error::{EngineError, ValidationError, ValidationErrors};
use crate::models::{CalculationInput, CalculationResult};
use crate::projection::project;
use crate::savings;
use crate::self_check::verify;
use crate::validation::{validate, ValidatedInput};
use crate::workload::resolve;
use rayon::prelude::*;
use tracing::{debug, error, warn};

/// Runs one calculation end to end.
pub fn calculate(
    input: &CalculationInput,
    table: &CountryBaselineTable,
    config: &EngineConfig,
) -> Result<CalculationResult, EngineError> {
    let validated = validate(input, table).map_err(|errors| {
        warn!(
            mode = ?input.mode,
            country = %input.country,
            violations = errors.errors().len(),
            "calculation input rejected: {}",
            errors
        );
        errors
    })?;
    calculate_validated(&validated, config)
}

/// Runs the pipeline on an already validated request.
pub fn calculate_validated(
    input: &ValidatedInput,
    config: &EngineConfig,
) -> Result<CalculationResult, EngineError> {
    let workload = resolve(input, config.standard_agent_hours_per_month);
    debug!(
        total_minutes = workload.total_minutes,
        human_minutes = workload.human_minutes,
        fte_required = workload.fte_required,
        "resolved workload"
    );

    let costs = compute_costs(input, &workload, config);
    debug!(
        traditional = costs.traditional_monthly_cost_usd,
        sentra = costs.sentra_monthly_cost_usd,
        basis = ?costs.basis,
        "computed costs"
    );

    let savings = savings::compute(
        &costs,
        input.implementation_cost_usd,
        input.analysis_period_months,
    );
    let projection = project(&savings, input.analysis_period_months).collect();

    let result = CalculationResult {
        mode: input.mode,
        country: input.country.clone(),
        cost_unit: costs.unit,
        cost_basis: costs.basis,
        total_minutes: workload.total_minutes,
        human_minutes: workload.human_minutes,
        fte_required: workload.fte_required,
        traditional_monthly_cost_usd: costs.traditional_monthly_cost_usd,
        sentra_monthly_cost_usd: costs.sentra_monthly_cost_usd,
        monthly_savings_usd: savings.monthly_savings_usd,
        annual_savings_usd: savings.annual_savings_usd,
        roi_percent: savings.roi_percent,
        roi_over_period_percent: savings.roi_over_period_percent,
        analysis_period_months: input.analysis_period_months,
        cost_reduction_percent: savings.cost_reduction_percent,
        payback_months: savings.payback_months,
        bundles_needed: bundles_needed(input),
        is_profitable: savings.is_profitable,
        is_cost_increase: savings.is_cost_increase,
        projection,
        breakdown: costs.breakdown,
    };

    if let Some((field, value)) = first_non_finite(&result) {
        warn!(field, value, mode = ?input.mode, "calculation left the f64 range");
        return Err(ValidationErrors::single(ValidationError::OutOfRange { field, value }).into());
    }

    verify(&result, config.consistency_tolerance).map_err(|err| {
        error!(
            field = err.field,
            stored = err.stored,
            recomputed = err.recomputed,
            mode = ?input.mode,
            "ROI result failed its consistency check"
        );
        err
    })?;
    Ok(result)
}

/// Names the first figure of `result` that overflowed or lost all
/// precision.  Such a result comes from the size of the request, not
/// from a formula defect.
fn first_non_finite(result: &CalculationResult) -> Option<(&'static str, f64)> {
    let figures = [
        ("fte_required", result.fte_required),
        ("traditional_monthly_cost_usd", result.traditional_monthly_cost_usd),
        ("sentra_monthly_cost_usd", result.sentra_monthly_cost_usd),
        ("monthly_savings_usd", result.monthly_savings_usd),
        ("annual_savings_usd", result.annual_savings_usd),
        ("roi_percent", result.roi_percent),
        ("roi_over_period_percent", result.roi_over_period_percent),
        ("cost_reduction_percent", result.cost_reduction_percent),
        ("payback_months", result.payback_months.unwrap_or(0.0)),
    ];
    figures
        .into_iter()
        .chain(
            result
                .projection
                .iter()
                .map(|p| ("projection.cumulative_savings_usd", p.cumulative_savings_usd)),
        )
        .find(|(_, value)| !value.is_finite())
}

/// Evaluates independent requests in parallel.  Results are returned
/// in input order, one per request.
pub fn calculate_batch(
    inputs: Vec<CalculationInput>,
    table: &CountryBaselineTable,
    config: &EngineConfig,
) -> Vec<Result<CalculationResult, EngineError>> {
    inputs
        .into_par_iter()
        .map(|input| calculate(&input, table, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationMode, CostBasis, CostUnit};

    fn bundle_input() -> CalculationInput {
        CalculationInput::new(CalculationMode::PerBundle, "Bangladesh", 1000, 1000)
            .with_bundle_price(1650.0)
    }

    #[test]
    fn per_bundle_result_states_its_unit() {
        let result = calculate(&bundle_input(), CountryBaselineTable::builtin(), &EngineConfig::default())
            .unwrap();
        assert_eq!(result.cost_unit, CostUnit::PerBundle);
        assert_eq!(result.cost_basis, CostBasis::QuotedPrice);
        assert_eq!(result.bundles_needed, 1);
        assert_eq!(result.projection.len(), 12);
    }

    #[test]
    fn two_bundle_month_counts_each_bundle_once() {
        let input = CalculationInput::new(CalculationMode::PerBundle, "Bangladesh", 2000, 2000)
            .with_bundle_price(1650.0)
            .with_bundles_per_month(2.0)
            .with_implementation_cost(7100.0);
        let result = calculate(&input, CountryBaselineTable::builtin(), &EngineConfig::default())
            .unwrap();
        assert!((result.traditional_monthly_cost_usd - 10400.0).abs() < 1e-9);
        assert!((result.sentra_monthly_cost_usd - 3300.0).abs() < 1e-9);
        assert!((result.monthly_savings_usd - 7100.0).abs() < 1e-9);
        assert!((result.annual_savings_usd - 85200.0).abs() < 1e-6);
        assert_eq!(result.bundles_needed, 2);
        assert!((result.payback_months.unwrap() - 1.0).abs() < 1e-9);
        assert!(result.projection[0].cumulative_savings_usd.abs() < 1e-6);
    }

    #[test]
    fn oversized_input_is_rejected_not_reported_as_a_defect() {
        let input = bundle_input().with_handle_minutes(1e306, 5.0);
        let err = calculate(&input, CountryBaselineTable::builtin(), &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn overflowing_staffing_cost_is_rejected() {
        let input = CalculationInput::new(CalculationMode::AgentCount, "India", 100, 100)
            .with_agent_count(u32::MAX)
            .with_agent_hourly_rate(1e300);
        let err = calculate(&input, CountryBaselineTable::builtin(), &EngineConfig::default())
            .unwrap_err();
        let EngineError::Invalid(errors) = err else {
            panic!("expected rejection, got {err:?}");
        };
        assert!(matches!(
            errors.errors(),
            [ValidationError::OutOfRange {
                field: "sentra_monthly_cost_usd",
                ..
            }]
        ));
    }

    #[test]
    fn invalid_input_returns_every_violation() {
        let input = CalculationInput::new(CalculationMode::AgentCount, "Bangladesh", 0, 0);
        let err = calculate(&input, CountryBaselineTable::builtin(), &EngineConfig::default())
            .unwrap_err();
        match err {
            EngineError::Invalid(errors) => assert_eq!(errors.errors().len(), 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn breakdown_attached_only_when_configured() {
        let config = EngineConfig {
            include_breakdown: true,
            ..EngineConfig::default()
        };
        let with = calculate(&bundle_input(), CountryBaselineTable::builtin(), &config).unwrap();
        let without = calculate(
            &bundle_input(),
            CountryBaselineTable::builtin(),
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(with.breakdown.is_some());
        assert!(without.breakdown.is_none());
        assert_eq!(with.sentra_monthly_cost_usd, without.sentra_monthly_cost_usd);
    }

    #[test]
    fn batch_preserves_order() {
        let inputs = vec![
            bundle_input(),
            CalculationInput::new(CalculationMode::PerBundle, "Bangladesh", 0, 1000),
            bundle_input().with_bpo_rate(0.90),
        ];
        let results = calculate_batch(inputs, CountryBaselineTable::builtin(), &EngineConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        let philippines_rate = results[2].as_ref().unwrap();
        assert!((philippines_rate.traditional_monthly_cost_usd - 11700.0).abs() < 1e-6);
    }
}
