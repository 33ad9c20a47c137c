use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::domain::TaxonomyGroup;
use crate::error::Result;
use crate::registry::ranges::CategoryRangeRegistry;

/// Classifies property names into exactly one of the two semantic groups.
///
/// Completeness relative to the range table is checked once at load time.
/// Properties that stay unmapped are excluded from output by the caller,
/// with a warning, never silently.
#[derive(Debug, Default)]
pub struct PropertyTaxonomy {
    groups: HashMap<String, TaxonomyGroup>,
}

impl PropertyTaxonomy {
    pub fn from_table(groups: HashMap<String, TaxonomyGroup>) -> Self {
        Self { groups }
    }

    /// Load the taxonomy from a JSON file of shape
    /// `{ "<property>": "generalCharacteristics" | "laserInteraction" }`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let groups: HashMap<String, TaxonomyGroup> = serde_json::from_str(&content)?;
        Ok(Self::from_table(groups))
    }

    pub fn classify(&self, property: &str) -> Option<TaxonomyGroup> {
        self.groups.get(property).copied()
    }

    /// Verify that every property in the range table resolves here.
    /// Runs once at load, not per entity; returns the unmapped names after
    /// logging one warning each.
    pub fn check_completeness(&self, ranges: &CategoryRangeRegistry) -> Vec<String> {
        let mut unmapped = Vec::new();
        for property in ranges.property_names() {
            if !self.groups.contains_key(property) {
                warn!(property, "range table property has no taxonomy mapping");
                unmapped.push(property.to_string());
            }
        }
        unmapped
    }
}
