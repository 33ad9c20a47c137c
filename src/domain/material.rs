use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw per-material attribute record as loaded from the upstream store.
/// Read-only input; the pipeline never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialRecord {
    /// Unique material name, also the basis of the output slug
    pub name: String,
    /// Top-level category (e.g. "metal", "polymer")
    pub category: String,
    /// Optional second classification level
    pub subcategory: Option<String>,
    /// Display title for the generated documents
    pub title: String,
    /// Image URLs carried through unchanged
    #[serde(default)]
    pub images: Vec<String>,
    /// Property groups: group name -> property name -> raw value.
    /// Groups may or may not already be split along taxonomy lines;
    /// the taxonomy resolver is authoritative either way.
    #[serde(default)]
    pub property_groups: BTreeMap<String, BTreeMap<String, RawPropertyValue>>,
    /// Raw machine/settings values for the settings document
    #[serde(default)]
    pub machine_settings: BTreeMap<String, RawPropertyValue>,
    /// Opaque author id, resolved through the external author registry
    pub author_id: String,
    /// Free-text narrative sections keyed by section name
    #[serde(default)]
    pub narrative_sections: BTreeMap<String, String>,
    /// Free-text challenges section for the settings document
    pub material_challenges: Option<String>,
    /// Free-text service offering section for the primary document
    pub service_offering: Option<String>,
    /// Heterogeneous standards list (legacy strings and structured entries)
    #[serde(default)]
    pub standards: Vec<RawStandard>,
}

/// A raw property value in any of the encodings the upstream stores use.
/// Transient: consumed once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPropertyValue {
    /// Bare scalar, assumed to already be in the property's declared unit
    Number(f64),
    /// A `<number><trailing unit text>` string, e.g. "9.7 ×10⁻⁵ m²/s"
    Text(String),
    /// Structured research data with optional per-material bounds
    Detailed {
        value: f64,
        unit: Option<String>,
        min: Option<f64>,
        max: Option<f64>,
        confidence: Option<f64>,
        source: Option<String>,
    },
}

/// One entry of the raw standards list. Legacy records are plain strings;
/// current records are structured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStandard {
    Legacy(String),
    Structured {
        #[serde(default)]
        name: Option<String>,
        description: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
}

/// Small attribute record returned by the external author registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    pub country: String,
    pub title: Option<String>,
}
