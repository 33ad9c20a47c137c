use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::property::{EnrichedProperty, ValueProvenance};
use super::standards::RegulatoryStandard;
use crate::domain::AuthorProfile;

/// Caller-supplied batch identity. Re-running with identical inputs and an
/// identical stamp produces byte-identical output.
#[derive(Debug, Clone, Copy)]
pub struct RunStamp {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

impl RunStamp {
    pub fn new(run_id: Uuid, generated_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            generated_at,
        }
    }
}

/// Shared audit block embedded in both documents of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub pipeline_version: String,
}

impl AuditStamp {
    pub fn from_run(stamp: &RunStamp) -> Self {
        Self {
            run_id: stamp.run_id,
            generated_at: stamp.generated_at,
            pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One link of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbLink {
    pub label: String,
    pub path: String,
}

/// Breadcrumb trail built from category -> subcategory -> material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub links: Vec<BreadcrumbLink>,
}

/// Thermal properties block on the settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalBlock {
    /// Thermal diffusivity in mm²/s
    pub diffusivity: EnrichedProperty,
    /// Thermal conductivity in W/(m·K)
    pub conductivity: EnrichedProperty,
    /// Destruction point in Kelvin
    pub destruction_point: EnrichedProperty,
    /// How the material fails at the destruction point (melt, decompose, ...)
    pub destruction_type: String,
    pub provenance: ValueProvenance,
}

/// Derived optimal operating window in J/cm². Only present when the lower
/// bound is strictly below the upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingWindow {
    pub lower: String,
    pub upper: String,
    pub unit: String,
}

/// Laser-material interaction block on the settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaserInteractionBlock {
    /// Damage threshold fluence in J/cm²
    pub damage_threshold: EnrichedProperty,
    /// Ablation threshold fluence in J/cm²
    pub ablation_threshold: EnrichedProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_operating_window: Option<OperatingWindow>,
    pub provenance: ValueProvenance,
}

/// The material-facing document: identity, narrative and researched
/// characteristics. Field selection is an explicit allow-list; source
/// fields not listed here are intentionally excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryView {
    pub name: String,
    pub slug: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub author: AuthorProfile,
    pub title: String,
    pub breadcrumb: Breadcrumb,
    pub images: Vec<String>,
    pub narrative_sections: BTreeMap<String, String>,
    pub regulatory_standards: Vec<RegulatoryStandard>,
    pub material_properties: BTreeMap<String, EnrichedProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_offering: Option<String>,
    pub audit_stamp: AuditStamp,
}

/// The machine-facing sibling document: settings, thermal behavior and
/// laser interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub name: String,
    pub slug: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub author: AuthorProfile,
    pub title: String,
    pub breadcrumb: Breadcrumb,
    pub images: Vec<String>,
    pub machine_settings: BTreeMap<String, EnrichedProperty>,
    pub thermal_properties: ThermalBlock,
    pub laser_material_interaction: LaserInteractionBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_challenges: Option<String>,
    pub audit_stamp: AuditStamp,
}

/// Serialized wrapper shared by both documents, for symmetry with sibling
/// content families.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MaterialDocument {
    #[serde(rename = "material")]
    Primary(PrimaryView),
    #[serde(rename = "material")]
    Settings(SettingsView),
}

impl MaterialDocument {
    /// File-name suffix distinguishing the two sibling documents.
    pub fn document_kind(&self) -> &'static str {
        match self {
            MaterialDocument::Primary(_) => "primary",
            MaterialDocument::Settings(_) => "settings",
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            MaterialDocument::Primary(view) => &view.slug,
            MaterialDocument::Settings(view) => &view.slug,
        }
    }
}

/// Build the canonical slug for a material name.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .replace(['\'', '"', '(', ')'], "")
}
