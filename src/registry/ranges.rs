use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

static EMPTY: Lazy<HashMap<String, RangeEnvelope>> = Lazy::new(HashMap::new);

/// Per-category min/max/unit envelope for one property. Bounds are in the
/// property's canonical unit. Absent bounds are a valid "unbounded, record
/// only" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEnvelope {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Read-only lookup of category -> property -> range envelope.
///
/// Loaded once and held for the duration of a batch run; `invalidate`
/// clears the table so the next run starts from a fresh load.
#[derive(Debug, Default)]
pub struct CategoryRangeRegistry {
    ranges: HashMap<String, HashMap<String, RangeEnvelope>>,
}

impl CategoryRangeRegistry {
    pub fn from_table(ranges: HashMap<String, HashMap<String, RangeEnvelope>>) -> Result<Self> {
        let registry = Self { ranges };
        registry.validate()?;
        Ok(registry)
    }

    /// Load the range table from a JSON file of shape
    /// `{ "<category>": { "<property>": { "min": .., "max": .., "unit": .. } } }`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let ranges: HashMap<String, HashMap<String, RangeEnvelope>> =
            serde_json::from_str(&content)?;
        Self::from_table(ranges)
    }

    /// All envelopes for a category. Unknown categories yield an empty
    /// mapping; absence is valid, never an error.
    pub fn ranges_for(&self, category: &str) -> &HashMap<String, RangeEnvelope> {
        self.ranges.get(category).unwrap_or(&EMPTY)
    }

    pub fn envelope_for(&self, category: &str, property: &str) -> Option<&RangeEnvelope> {
        self.ranges.get(category).and_then(|props| props.get(property))
    }

    /// Property names appearing anywhere in the table, for the load-time
    /// taxonomy completeness check.
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .ranges
            .values()
            .flat_map(|props| props.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Clears the cached table. Callers construct a fresh context for the
    /// next run; invalidation is a between-runs operation.
    pub fn invalidate(&mut self) {
        self.ranges.clear();
    }

    fn validate(&self) -> Result<()> {
        for (category, props) in &self.ranges {
            for (property, envelope) in props {
                if let (Some(min), Some(max)) = (envelope.min, envelope.max) {
                    if min > max {
                        return Err(PipelineError::Config(format!(
                            "Range table for {}.{} has min {} above max {}",
                            category, property, min, max
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
