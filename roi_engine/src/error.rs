//! Error taxonomy for the ROI engine.
//!
//! Input problems are reported as a complete list of
//! [`ValidationError`]s so a caller can surface every bad field at
//! once.  A [`ConsistencyError`] means the engine's own arithmetic
//! disagrees with itself; it is a defect, not a user mistake, and no
//! result is ever returned alongside it.

use crate::models::CalculationMode;
use std::fmt;
use thiserror::Error;

/// A single rejected field in a [`crate::models::CalculationInput`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a positive volume, got {value}")]
    InvalidVolume { field: &'static str, value: u64 },

    #[error("unknown country {0:?} and no rate overrides supplied")]
    UnknownCountry(String),

    #[error("automation fraction must lie in [0, 1], got {0}")]
    InvalidAutomationFraction(f64),

    #[error("{mode:?} mode requires a positive agent count")]
    MissingAgentCount { mode: CalculationMode },

    #[error("analysis period must be between 1 and 36 months, got {0}")]
    InvalidPeriod(u32),

    #[error("{field} must be a positive number of minutes, got {value}")]
    InvalidHandleTime { field: &'static str, value: f64 },

    #[error("{field} must be positive for per-bundle pricing, got {value:?}")]
    InvalidBundlePricing {
        field: &'static str,
        value: Option<f64>,
    },

    #[error("implementation cost must be a non-negative amount, got {0}")]
    InvalidImplementationCost(f64),

    #[error("{field} override must be a positive rate, got {value}")]
    InvalidRateOverride { field: &'static str, value: f64 },

    #[error("{field} is too large to compute ({value})")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Every violation found in one request.  Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Wraps the collected violations; returns `None` when there are none.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A stored result field that does not match its recomputation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("consistency check failed for {field}: stored {stored}, recomputed {recomputed}")]
pub struct ConsistencyError {
    pub field: &'static str,
    pub stored: f64,
    pub recomputed: f64,
}

/// Anything that stops [`crate::engine::calculate`] from producing a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("input rejected: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("internal formula error: {0}")]
    Consistency(#[from] ConsistencyError),
}

/// Failures while preparing a record for the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestionError {
    #[error("contact email {0:?} is not a valid address")]
    InvalidEmail(String),
}
