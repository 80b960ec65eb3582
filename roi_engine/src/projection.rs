//! Month-by-month cumulative savings.

use crate::models::ProjectionPoint;
use crate::savings::SavingsResult;
use crate::validation::MAX_ANALYSIS_PERIOD_MONTHS;

/// A finite series of [`ProjectionPoint`]s, one per month.
///
/// Clone it to replay the series from the start.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    monthly_savings_usd: f64,
    implementation_cost_usd: f64,
    months: u32,
    next_month: u32,
}

impl Iterator for Projection {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<ProjectionPoint> {
        if self.next_month > self.months {
            return None;
        }
        let month = self.next_month;
        self.next_month += 1;
        // The implementation cost is charged once, in month 1, and
        // carried in every cumulative figure after it.
        let cumulative_savings_usd =
            self.monthly_savings_usd * f64::from(month) - self.implementation_cost_usd;
        Some(ProjectionPoint {
            month,
            cumulative_savings_usd,
            monthly_savings_usd: self.monthly_savings_usd,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.months + 1).saturating_sub(self.next_month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Projection {}

/// Projects `savings` over `period_months`, capped at 36 months.
pub fn project(savings: &SavingsResult, period_months: u32) -> Projection {
    Projection {
        monthly_savings_usd: savings.monthly_savings_usd,
        implementation_cost_usd: savings.implementation_cost_usd,
        months: period_months.min(MAX_ANALYSIS_PERIOD_MONTHS),
        next_month: 1,
    }
}
