//! Workload minutes and staffing.

use crate::models::{FteSource, Workload};
use crate::validation::ValidatedInput;

/// Converts volumes and handle times into minutes and FTEs.
///
/// A caller-supplied agent count is echoed verbatim as the FTE figure;
/// otherwise FTEs are derived from the human share of the minutes.
/// No rounding happens here.
pub fn resolve(input: &ValidatedInput, standard_agent_hours_per_month: f64) -> Workload {
    let total_call_minutes = input.calls as f64 * input.call_handle_minutes;
    let total_interaction_minutes = input.interactions as f64 * input.interaction_handle_minutes;
    let total_minutes = total_call_minutes + total_interaction_minutes;
    let human_minutes = total_minutes * (1.0 - input.automation_fraction);
    let automated_minutes = total_minutes - human_minutes;

    let (fte_required, fte_source) = match input.agent_count {
        Some(agents) => (f64::from(agents), FteSource::Supplied),
        None => (
            human_minutes / 60.0 / standard_agent_hours_per_month,
            FteSource::Derived,
        ),
    };

    Workload {
        total_call_minutes,
        total_interaction_minutes,
        total_minutes,
        human_minutes,
        automated_minutes,
        fte_required,
        fte_source,
    }
}
