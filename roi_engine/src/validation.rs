//! Request validation and normalisation.
//!
//! [`validate`] checks a raw [`CalculationInput`] against the country
//! table and either returns a [`ValidatedInput`] with every default
//! and rate resolved, or the full list of violations.  Nothing past
//! this module looks at the raw request again.

use crate::baseline::CountryBaselineTable;
use crate::cost::{reference_bundles, BUNDLE_REFERENCE_VOLUME};
use crate::error::{ValidationError, ValidationErrors};
use crate::models::{CalculationInput, CalculationMode};

pub const DEFAULT_CALL_HANDLE_MINUTES: f64 = 8.0;
pub const DEFAULT_INTERACTION_HANDLE_MINUTES: f64 = 5.0;
pub const DEFAULT_ANALYSIS_PERIOD_MONTHS: u32 = 12;
pub const MAX_ANALYSIS_PERIOD_MONTHS: u32 = 36;

/// How SentraTech's cost is priced for this request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pricing {
    /// Residual human labor after automation.
    Labor { agent_hourly_rate_usd: f64 },
    /// Quoted bundle price.  `bundles_per_month` and the agent rate
    /// feed the internal breakdown alone; the agent rate is only known
    /// when the country or an override provides it.
    Bundle {
        bundle_price_usd: f64,
        bundles_per_month: f64,
        agent_hourly_rate_usd: Option<f64>,
    },
}

/// A request that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub mode: CalculationMode,
    /// Canonical table name, or the trimmed request name when both
    /// rates were overridden for a country outside the table.
    pub country: String,
    pub calls: u64,
    pub interactions: u64,
    pub call_handle_minutes: f64,
    pub interaction_handle_minutes: f64,
    pub automation_fraction: f64,
    /// Agent headcount to use verbatim instead of deriving FTEs.
    pub agent_count: Option<u32>,
    pub implementation_cost_usd: f64,
    pub analysis_period_months: u32,
    pub bpo_per_minute_rate_usd: f64,
    pub pricing: Pricing,
}

impl ValidatedInput {
    pub fn agent_hourly_rate_usd(&self) -> Option<f64> {
        match self.pricing {
            Pricing::Labor {
                agent_hourly_rate_usd,
            } => Some(agent_hourly_rate_usd),
            Pricing::Bundle {
                agent_hourly_rate_usd,
                ..
            } => agent_hourly_rate_usd,
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Rejects requests whose own figures cannot be carried through an
/// analysis period in `f64`: huge handle times or rates that would
/// overflow to infinity.
fn check_magnitudes(
    input: &CalculationInput,
    call_handle_minutes: f64,
    interaction_handle_minutes: f64,
    bpo_rate: Option<f64>,
    bundle_price: Option<f64>,
    analysis_period_months: u32,
    errors: &mut Vec<ValidationError>,
) {
    let call_minutes = input.calls as f64 * call_handle_minutes;
    let interaction_minutes = input.interactions as f64 * interaction_handle_minutes;
    let total_minutes = call_minutes + interaction_minutes;
    if !total_minutes.is_finite() {
        let (field, value) = if call_minutes.is_finite() {
            ("interaction_handle_minutes", interaction_handle_minutes)
        } else {
            ("call_handle_minutes", call_handle_minutes)
        };
        errors.push(ValidationError::InvalidHandleTime { field, value });
        return;
    }

    let months = analysis_period_months as f64;
    if let Some(rate) = bpo_rate {
        let traditional = total_minutes * rate * months;
        if !traditional.is_finite() {
            errors.push(ValidationError::OutOfRange {
                field: "traditional_cost_usd",
                value: traditional,
            });
        }
    }
    if let Some(price) = bundle_price {
        let volume = (input.calls as f64 + input.interactions as f64) / BUNDLE_REFERENCE_VOLUME;
        let quoted = volume * price * months;
        if !quoted.is_finite() {
            errors.push(ValidationError::OutOfRange {
                field: "sentra_cost_usd",
                value: quoted,
            });
        }
    }
}

/// Validates `input`, collecting every violation rather than stopping
/// at the first.
pub fn validate(
    input: &CalculationInput,
    table: &CountryBaselineTable,
) -> Result<ValidatedInput, ValidationErrors> {
    let mut errors = Vec::new();

    if input.calls == 0 {
        errors.push(ValidationError::InvalidVolume {
            field: "calls",
            value: input.calls,
        });
    }
    if input.interactions == 0 {
        errors.push(ValidationError::InvalidVolume {
            field: "interactions",
            value: input.interactions,
        });
    }

    let call_handle_minutes = input
        .call_handle_minutes
        .unwrap_or(DEFAULT_CALL_HANDLE_MINUTES);
    if !is_positive(call_handle_minutes) {
        errors.push(ValidationError::InvalidHandleTime {
            field: "call_handle_minutes",
            value: call_handle_minutes,
        });
    }
    let interaction_handle_minutes = input
        .interaction_handle_minutes
        .unwrap_or(DEFAULT_INTERACTION_HANDLE_MINUTES);
    if !is_positive(interaction_handle_minutes) {
        errors.push(ValidationError::InvalidHandleTime {
            field: "interaction_handle_minutes",
            value: interaction_handle_minutes,
        });
    }

    let automation_fraction = input
        .automation_fraction
        .unwrap_or_else(|| input.mode.default_automation_fraction());
    if !(automation_fraction.is_finite() && (0.0..=1.0).contains(&automation_fraction)) {
        errors.push(ValidationError::InvalidAutomationFraction(
            automation_fraction,
        ));
    }

    let analysis_period_months = input
        .analysis_period_months
        .unwrap_or(DEFAULT_ANALYSIS_PERIOD_MONTHS);
    if !(1..=MAX_ANALYSIS_PERIOD_MONTHS).contains(&analysis_period_months) {
        errors.push(ValidationError::InvalidPeriod(analysis_period_months));
    }

    let implementation_cost_usd = input.implementation_cost_usd.unwrap_or(0.0);
    if !(implementation_cost_usd.is_finite() && implementation_cost_usd >= 0.0) {
        errors.push(ValidationError::InvalidImplementationCost(
            implementation_cost_usd,
        ));
    }

    for (field, value) in [
        ("agent_hourly_rate_usd", input.agent_hourly_rate_usd),
        ("bpo_per_minute_rate_usd", input.bpo_per_minute_rate_usd),
    ] {
        if let Some(rate) = value {
            if !is_positive(rate) {
                errors.push(ValidationError::InvalidRateOverride { field, value: rate });
            }
        }
    }

    // Rates: overrides win over the baseline.  A country outside the
    // table is only usable when it is named and every rate the mode
    // prices with is overridden.
    let baseline = table.get(&input.country);
    let country = baseline
        .map(|b| b.name.clone())
        .unwrap_or_else(|| input.country.trim().to_string());
    let bpo_rate = input
        .bpo_per_minute_rate_usd
        .or_else(|| baseline.map(|b| b.bpo_per_minute_rate_usd));
    let agent_rate = input
        .agent_hourly_rate_usd
        .or_else(|| baseline.map(|b| b.agent_hourly_rate_loaded_usd));
    let rates_missing =
        bpo_rate.is_none() || (input.mode.is_labor_driven() && agent_rate.is_none());
    if country.is_empty() || (baseline.is_none() && rates_missing) {
        errors.push(ValidationError::UnknownCountry(input.country.clone()));
    }

    let agent_count = match input.mode {
        CalculationMode::AgentCount => match input.agent_count {
            Some(n) if n > 0 => Some(n),
            _ => {
                errors.push(ValidationError::MissingAgentCount { mode: input.mode });
                None
            }
        },
        CalculationMode::CallVolume => match input.agent_count {
            Some(0) => {
                errors.push(ValidationError::MissingAgentCount { mode: input.mode });
                None
            }
            manual => manual,
        },
        CalculationMode::PerBundle => None,
    };

    let mut bundle_terms = None;
    if input.mode == CalculationMode::PerBundle {
        let price = input.bundle_price_usd.filter(|p| is_positive(*p));
        if price.is_none() {
            errors.push(ValidationError::InvalidBundlePricing {
                field: "bundle_price_usd",
                value: input.bundle_price_usd,
            });
        }
        // A zero volume is already reported, so only a supplied count
        // is checked here.
        let bundles = match input.bundles_per_month {
            Some(bundles) => {
                if !is_positive(bundles) {
                    errors.push(ValidationError::InvalidBundlePricing {
                        field: "bundles_per_month",
                        value: Some(bundles),
                    });
                }
                bundles
            }
            None => reference_bundles(input.calls, input.interactions),
        };
        bundle_terms = price.map(|p| (p, bundles));
    }

    if errors.is_empty() {
        check_magnitudes(
            input,
            call_handle_minutes,
            interaction_handle_minutes,
            bpo_rate,
            bundle_terms.map(|(price, _)| price),
            analysis_period_months,
            &mut errors,
        );
    }

    if let Some(errors) = ValidationErrors::from_vec(errors) {
        return Err(errors);
    }

    // With no violations recorded every resolved value is present.
    let (pricing, bpo_per_minute_rate_usd) = match (input.mode, bundle_terms, agent_rate, bpo_rate) {
        (CalculationMode::PerBundle, Some((bundle_price_usd, bundles_per_month)), rate, Some(bpo)) => (
            Pricing::Bundle {
                bundle_price_usd,
                bundles_per_month,
                agent_hourly_rate_usd: rate,
            },
            bpo,
        ),
        (mode, _, Some(agent_hourly_rate_usd), Some(bpo)) if mode.is_labor_driven() => {
            (Pricing::Labor { agent_hourly_rate_usd }, bpo)
        }
        _ => {
            return Err(ValidationErrors::single(ValidationError::UnknownCountry(
                input.country.clone(),
            )))
        }
    };

    Ok(ValidatedInput {
        mode: input.mode,
        country,
        calls: input.calls,
        interactions: input.interactions,
        call_handle_minutes,
        interaction_handle_minutes,
        automation_fraction,
        agent_count,
        implementation_cost_usd,
        analysis_period_months,
        bpo_per_minute_rate_usd,
        pricing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> &'static CountryBaselineTable {
        CountryBaselineTable::builtin()
    }

    fn bundle_input() -> CalculationInput {
        CalculationInput::new(CalculationMode::PerBundle, "Bangladesh", 1000, 1000)
            .with_bundle_price(1650.0)
    }

    #[test]
    fn applies_defaults() {
        let validated = validate(&bundle_input(), table()).unwrap();
        assert_eq!(validated.call_handle_minutes, 8.0);
        assert_eq!(validated.interaction_handle_minutes, 5.0);
        assert_eq!(validated.automation_fraction, 0.70);
        assert_eq!(validated.analysis_period_months, 12);
        assert_eq!(validated.implementation_cost_usd, 0.0);
        assert_eq!(validated.bpo_per_minute_rate_usd, 0.40);
        assert_eq!(
            validated.pricing,
            Pricing::Bundle {
                bundle_price_usd: 1650.0,
                bundles_per_month: 1.0,
                agent_hourly_rate_usd: Some(3.20),
            }
        );
    }

    #[test]
    fn labor_modes_default_to_sixty_percent_automation() {
        let input = CalculationInput::new(CalculationMode::CallVolume, "India", 500, 500);
        let validated = validate(&input, table()).unwrap();
        assert_eq!(validated.automation_fraction, 0.60);
        assert_eq!(validated.agent_count, None);
        assert_eq!(
            validated.pricing,
            Pricing::Labor {
                agent_hourly_rate_usd: 4.50
            }
        );
    }

    #[test]
    fn canonicalises_country_name() {
        let mut input = bundle_input();
        input.country = " bangladesh".into();
        assert_eq!(validate(&input, table()).unwrap().country, "Bangladesh");
    }

    #[test]
    fn zero_volumes_are_rejected() {
        let input = CalculationInput::new(CalculationMode::PerBundle, "Bangladesh", 0, 0)
            .with_bundle_price(1650.0);
        let errors = validate(&input, table()).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[
                ValidationError::InvalidVolume {
                    field: "calls",
                    value: 0
                },
                ValidationError::InvalidVolume {
                    field: "interactions",
                    value: 0
                },
            ]
        );
    }

    #[test]
    fn collects_every_violation() {
        let input = CalculationInput::new(CalculationMode::AgentCount, "Atlantis", 0, 10)
            .with_automation_fraction(1.5)
            .with_analysis_period(48);
        let errors = validate(&input, table()).unwrap_err();
        let errors = errors.errors();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidAutomationFraction(1.5)));
        assert!(errors.contains(&ValidationError::InvalidPeriod(48)));
        assert!(errors.contains(&ValidationError::UnknownCountry("Atlantis".into())));
        assert!(errors.contains(&ValidationError::MissingAgentCount {
            mode: CalculationMode::AgentCount
        }));
    }

    #[test]
    fn period_bounds_are_inclusive() {
        assert!(validate(&bundle_input().with_analysis_period(1), table()).is_ok());
        assert!(validate(&bundle_input().with_analysis_period(36), table()).is_ok());
        assert!(validate(&bundle_input().with_analysis_period(0), table()).is_err());
        assert!(validate(&bundle_input().with_analysis_period(37), table()).is_err());
    }

    #[test]
    fn automation_fraction_bounds_are_inclusive() {
        assert!(validate(&bundle_input().with_automation_fraction(0.0), table()).is_ok());
        assert!(validate(&bundle_input().with_automation_fraction(1.0), table()).is_ok());
        assert!(validate(&bundle_input().with_automation_fraction(-0.01), table()).is_err());
        assert!(validate(&bundle_input().with_automation_fraction(f64::NAN), table()).is_err());
    }

    #[test]
    fn agent_count_mode_requires_positive_count() {
        let input = CalculationInput::new(CalculationMode::AgentCount, "India", 100, 100);
        assert!(validate(&input, table()).is_err());
        assert!(validate(&input.clone().with_agent_count(0), table()).is_err());
        let validated = validate(&input.with_agent_count(12), table()).unwrap();
        assert_eq!(validated.agent_count, Some(12));
    }

    #[test]
    fn call_volume_accepts_manual_agent_count() {
        let input = CalculationInput::new(CalculationMode::CallVolume, "India", 100, 100)
            .with_agent_count(7);
        assert_eq!(validate(&input, table()).unwrap().agent_count, Some(7));
    }

    #[test]
    fn per_bundle_ignores_agent_count() {
        let validated = validate(&bundle_input().with_agent_count(9), table()).unwrap();
        assert_eq!(validated.agent_count, None);
    }

    #[test]
    fn overrides_supersede_baseline() {
        let validated = validate(&bundle_input().with_bpo_rate(0.90), table()).unwrap();
        assert_eq!(validated.bpo_per_minute_rate_usd, 0.90);
    }

    #[test]
    fn unknown_country_usable_with_overrides() {
        let input = CalculationInput::new(CalculationMode::CallVolume, "Kenya", 100, 100)
            .with_bpo_rate(0.45)
            .with_agent_hourly_rate(4.0);
        let validated = validate(&input, table()).unwrap();
        assert_eq!(validated.country, "Kenya");
        assert_eq!(validated.agent_hourly_rate_usd(), Some(4.0));

        // Labor modes also need the agent rate.
        let partial = CalculationInput::new(CalculationMode::CallVolume, "Kenya", 100, 100)
            .with_bpo_rate(0.45);
        assert_eq!(
            validate(&partial, table()).unwrap_err().errors(),
            &[ValidationError::UnknownCountry("Kenya".into())]
        );
    }

    #[test]
    fn per_bundle_requires_price() {
        let input = CalculationInput::new(CalculationMode::PerBundle, "India", 100, 100)
            .with_bundles_per_month(0.0);
        let errors = validate(&input, table()).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[
                ValidationError::InvalidBundlePricing {
                    field: "bundle_price_usd",
                    value: None
                },
                ValidationError::InvalidBundlePricing {
                    field: "bundles_per_month",
                    value: Some(0.0)
                },
            ]
        );
    }

    #[test]
    fn rejects_bad_overrides_and_costs() {
        let input = bundle_input()
            .with_bpo_rate(-1.0)
            .with_implementation_cost(-5.0)
            .with_handle_minutes(0.0, 5.0);
        let errors = validate(&input, table()).unwrap_err();
        assert_eq!(errors.errors().len(), 3);
    }

    #[test]
    fn bundles_per_month_defaults_to_volume() {
        let input = CalculationInput::new(CalculationMode::PerBundle, "Bangladesh", 2500, 1000)
            .with_bundle_price(1650.0);
        let Pricing::Bundle {
            bundles_per_month, ..
        } = validate(&input, table()).unwrap().pricing
        else {
            panic!("expected bundle pricing");
        };
        assert_eq!(bundles_per_month, 2.5);
    }

    #[test]
    fn overflowing_handle_time_is_rejected() {
        let input = bundle_input().with_handle_minutes(1e306, 5.0);
        assert_eq!(
            validate(&input, table()).unwrap_err().errors(),
            &[ValidationError::InvalidHandleTime {
                field: "call_handle_minutes",
                value: 1e306
            }]
        );
    }

    #[test]
    fn overflowing_rates_are_rejected() {
        let errors = validate(
            &bundle_input().with_bpo_rate(1e305).with_bundle_price(1e307),
            table(),
        )
        .unwrap_err();
        let fields: Vec<_> = errors
            .errors()
            .iter()
            .map(|e| match e {
                ValidationError::OutOfRange { field, .. } => *field,
                other => panic!("unexpected violation {other:?}"),
            })
            .collect();
        assert_eq!(fields, ["traditional_cost_usd", "sentra_cost_usd"]);
    }

    #[test]
    fn blank_country_is_rejected_even_with_overrides() {
        for name in ["", "   "] {
            let input = CalculationInput::new(CalculationMode::CallVolume, name, 100, 100)
                .with_bpo_rate(0.45)
                .with_agent_hourly_rate(4.0);
            assert_eq!(
                validate(&input, table()).unwrap_err().errors(),
                &[ValidationError::UnknownCountry(name.to_string())]
            );
        }
    }
}
