use serde::{Deserialize, Serialize};

/// The two semantic groups a property can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxonomyGroup {
    /// General material characteristics shown on the primary document
    GeneralCharacteristics,
    /// Laser-interaction characteristics shown on the settings document
    LaserInteraction,
}

/// A property after unit normalization and range enrichment.
///
/// Presence of min/max does not imply `min <= value <= max`: out-of-range
/// values are reported via `out_of_range`, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProperty {
    /// Display-formatted canonical value
    pub value: String,
    /// Canonical unit the value is expressed in
    pub unit: String,
    /// Lower bound, formatted; absent when neither the record nor the
    /// category table carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    /// True when the value falls outside the attached bounds
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub out_of_range: bool,
}

/// Where a laser-interaction value came from. Category defaults must stay
/// visibly distinguishable from researched data in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueProvenance {
    /// Explicit research data present on the material record
    Researched,
    /// Substituted from the (category, subcategory) default table
    CategoryDefault,
    /// Substituted from the single hard-coded last-resort row
    LastResortDefault,
}
