//! Country labor and BPO rate baselines.
//!
//! The `baseline` module holds the static table of per-country rates
//! the cost model prices against.  A table is either the built-in one
//! or loaded once from a versioned JSON file at startup; after
//! construction it exposes no way to change its contents, so it can
//! be shared across threads behind an `Arc` or a `&'static`.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Rates for one supported country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryBaseline {
    pub name: String,
    /// Fully loaded hourly cost of one in-house agent.
    pub agent_hourly_rate_loaded_usd: f64,
    /// What a BPO vendor charges per handled minute.
    pub bpo_per_minute_rate_usd: f64,
}

/// On-disk layout of a rate table file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CountryTableFile {
    version: String,
    countries: Vec<CountryBaseline>,
}

// (name, agent hourly loaded, BPO per minute)
const BUILTIN_RATES: &[(&str, f64, f64)] = &[
    ("Bangladesh", 3.20, 0.40),
    ("India", 4.50, 0.55),
    ("Philippines", 7.50, 0.90),
    ("Vietnam", 5.00, 0.60),
];

const BUILTIN_VERSION: &str = "builtin-2025";

static BUILTIN: Lazy<CountryBaselineTable> = Lazy::new(|| {
    let countries = BUILTIN_RATES
        .iter()
        .map(|&(name, agent, bpo)| CountryBaseline {
            name: name.to_string(),
            agent_hourly_rate_loaded_usd: agent,
            bpo_per_minute_rate_usd: bpo,
        })
        .collect();
    CountryBaselineTable {
        version: BUILTIN_VERSION.to_string(),
        countries,
    }
});

/// Immutable mapping from country name to [`CountryBaseline`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryBaselineTable {
    version: String,
    countries: Vec<CountryBaseline>,
}

impl CountryBaselineTable {
    /// The table compiled into the crate.
    pub fn builtin() -> &'static CountryBaselineTable {
        &BUILTIN
    }

    /// Builds a table, rejecting duplicate names and non-positive or
    /// non-finite rates.
    pub fn new(version: impl Into<String>, countries: Vec<CountryBaseline>) -> Result<Self> {
        let mut seen = HashSet::new();
        for country in &countries {
            let key = normalize_name(&country.name);
            if key.is_empty() {
                bail!("country table contains an entry with an empty name");
            }
            if !seen.insert(key) {
                bail!("country {:?} is listed more than once", country.name);
            }
            for (field, rate) in [
                ("agent_hourly_rate_loaded_usd", country.agent_hourly_rate_loaded_usd),
                ("bpo_per_minute_rate_usd", country.bpo_per_minute_rate_usd),
            ] {
                if !(rate.is_finite() && rate > 0.0) {
                    bail!("country {:?} has invalid {}: {}", country.name, field, rate);
                }
            }
        }
        Ok(Self {
            version: version.into(),
            countries,
        })
    }

    /// Parses a table from its JSON representation.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let file: CountryTableFile =
            serde_json::from_str(data).context("country table is not valid JSON")?;
        Self::new(file.version, file.countries)
    }

    /// Loads a table from a JSON file on disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading country table {}", path.display()))?;
        Self::from_json_str(&data)
            .with_context(|| format!("failed loading country table {}", path.display()))
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn get(&self, name: &str) -> Option<&CountryBaseline> {
        let key = normalize_name(name);
        self.countries
            .iter()
            .find(|c| normalize_name(&c.name) == key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn countries(&self) -> &[CountryBaseline] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
