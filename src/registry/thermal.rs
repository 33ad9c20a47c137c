use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::ValueProvenance;
use crate::error::Result;

/// Wildcard subcategory key in the default table.
pub const SUBCATEGORY_WILDCARD: &str = "*";

/// The single hard-coded last-resort row, used only when neither the exact
/// nor the wildcard lookup finds a match. Values are deliberately
/// conservative mid-range figures.
static LAST_RESORT: Lazy<ThermalDefaultRow> = Lazy::new(|| ThermalDefaultRow {
    diffusivity: 1.0,
    conductivity: 1.0,
    destruction_point: 400.0,
    destruction_type: "melt".to_string(),
    damage_threshold: 10.0,
    ablation_threshold: 2.0,
});

/// Category-level laser-interaction defaults. A row is only ever a
/// last-resort substitute for missing research data, never an override.
///
/// Units: diffusivity mm²/s, conductivity W/(m·K), destruction point °C,
/// thresholds J/cm².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalDefaultRow {
    pub diffusivity: f64,
    pub conductivity: f64,
    pub destruction_point: f64,
    pub destruction_type: String,
    pub damage_threshold: f64,
    pub ablation_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThermalDefaultEntry {
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(flatten)]
    row: ThermalDefaultRow,
}

/// Ordered lookup strategies for default resolution. The order is part of
/// the contract: exact match, then category wildcard, then the hard-coded
/// last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupStrategy {
    Exact,
    CategoryWildcard,
    LastResort,
}

const LOOKUP_ORDER: [LookupStrategy; 3] = [
    LookupStrategy::Exact,
    LookupStrategy::CategoryWildcard,
    LookupStrategy::LastResort,
];

/// Static (category, subcategory-or-wildcard) -> default row table.
#[derive(Debug, Default)]
pub struct ThermalDefaults {
    rows: HashMap<(String, String), ThermalDefaultRow>,
}

impl ThermalDefaults {
    pub fn from_rows(
        rows: impl IntoIterator<Item = (String, Option<String>, ThermalDefaultRow)>,
    ) -> Self {
        let rows = rows
            .into_iter()
            .map(|(category, subcategory, row)| {
                let sub = subcategory.unwrap_or_else(|| SUBCATEGORY_WILDCARD.to_string());
                ((category, sub), row)
            })
            .collect();
        Self { rows }
    }

    /// Load the default table from a JSON array of rows, each with
    /// `category`, optional `subcategory` (absent means wildcard) and the
    /// six default fields.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: Vec<ThermalDefaultEntry> = serde_json::from_str(&content)?;
        Ok(Self::from_rows(
            entries
                .into_iter()
                .map(|e| (e.category, e.subcategory, e.row)),
        ))
    }

    /// Resolve the default row for a material, trying each strategy in
    /// order. The returned provenance flag distinguishes a table hit from
    /// the hard-coded last resort; it ends up on the output blocks so
    /// substituted values stay visibly different from researched ones.
    pub fn resolve(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> (&ThermalDefaultRow, ValueProvenance) {
        for strategy in LOOKUP_ORDER {
            match strategy {
                LookupStrategy::Exact => {
                    if let Some(sub) = subcategory {
                        let key = (category.to_string(), sub.to_string());
                        if let Some(row) = self.rows.get(&key) {
                            return (row, ValueProvenance::CategoryDefault);
                        }
                    }
                }
                LookupStrategy::CategoryWildcard => {
                    let key = (category.to_string(), SUBCATEGORY_WILDCARD.to_string());
                    if let Some(row) = self.rows.get(&key) {
                        return (row, ValueProvenance::CategoryDefault);
                    }
                }
                LookupStrategy::LastResort => {
                    return (&LAST_RESORT, ValueProvenance::LastResortDefault);
                }
            }
        }
        unreachable!("last-resort strategy always resolves")
    }
}
