use std::collections::BTreeMap;

use crate::domain::{
    AuditStamp, AuthorProfile, Breadcrumb, BreadcrumbLink, EnrichedProperty,
    LaserInteractionBlock, MaterialDocument, PrimaryView, RegulatoryStandard, RunStamp,
    SettingsView, ThermalBlock,
};
use crate::domain::views::slugify;

/// Everything gathered about one material before projection. Created per
/// entity, discarded once both documents are assembled.
#[derive(Debug, Clone)]
pub struct EnrichedMaterial {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub title: String,
    pub images: Vec<String>,
    pub author: AuthorProfile,
    pub narrative_sections: BTreeMap<String, String>,
    pub material_challenges: Option<String>,
    pub service_offering: Option<String>,
    pub material_properties: BTreeMap<String, EnrichedProperty>,
    pub machine_settings: BTreeMap<String, EnrichedProperty>,
    pub thermal: ThermalBlock,
    pub interaction: LaserInteractionBlock,
    pub standards: Vec<RegulatoryStandard>,
}

/// The two sibling documents a material projects into. Each variant owns
/// its projection; there is no string-keyed dispatch and no way to ask for
/// a third view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Primary,
    Settings,
}

impl ViewKind {
    pub const ALL: [ViewKind; 2] = [ViewKind::Primary, ViewKind::Settings];

    pub fn assemble(self, source: &EnrichedMaterial, stamp: &RunStamp) -> MaterialDocument {
        match self {
            ViewKind::Primary => MaterialDocument::Primary(project_primary(source, stamp)),
            ViewKind::Settings => MaterialDocument::Settings(project_settings(source, stamp)),
        }
    }
}

/// Projection for the material-facing document. The field list is the
/// allow-list: source fields not copied here are excluded on purpose.
fn project_primary(source: &EnrichedMaterial, stamp: &RunStamp) -> PrimaryView {
    PrimaryView {
        name: source.name.clone(),
        slug: source.slug.clone(),
        category: source.category.clone(),
        subcategory: source.subcategory.clone(),
        author: source.author.clone(),
        title: source.title.clone(),
        breadcrumb: primary_breadcrumb(source),
        images: source.images.clone(),
        narrative_sections: source.narrative_sections.clone(),
        regulatory_standards: source.standards.clone(),
        material_properties: source.material_properties.clone(),
        service_offering: source.service_offering.clone(),
        audit_stamp: AuditStamp::from_run(stamp),
    }
}

/// Projection for the machine-facing sibling document.
fn project_settings(source: &EnrichedMaterial, stamp: &RunStamp) -> SettingsView {
    SettingsView {
        name: source.name.clone(),
        slug: source.slug.clone(),
        category: source.category.clone(),
        subcategory: source.subcategory.clone(),
        author: source.author.clone(),
        title: source.title.clone(),
        breadcrumb: settings_breadcrumb(source),
        images: source.images.clone(),
        machine_settings: source.machine_settings.clone(),
        thermal_properties: source.thermal.clone(),
        laser_material_interaction: source.interaction.clone(),
        material_challenges: source.material_challenges.clone(),
        audit_stamp: AuditStamp::from_run(stamp),
    }
}

fn primary_breadcrumb(source: &EnrichedMaterial) -> Breadcrumb {
    breadcrumb_under("Materials", "/materials", source, &source.name)
}

fn settings_breadcrumb(source: &EnrichedMaterial) -> Breadcrumb {
    let leaf = format!("{} laser settings", source.name);
    breadcrumb_under("Laser Settings", "/laser-settings", source, &leaf)
}

/// Category -> subcategory -> material trail below the given root.
fn breadcrumb_under(
    root_label: &str,
    root_path: &str,
    source: &EnrichedMaterial,
    leaf_label: &str,
) -> Breadcrumb {
    let mut links = vec![BreadcrumbLink {
        label: root_label.to_string(),
        path: root_path.to_string(),
    }];
    let mut path = root_path.to_string();

    path = format!("{}/{}", path, slugify(&source.category));
    links.push(BreadcrumbLink {
        label: source.category.clone(),
        path: path.clone(),
    });

    if let Some(subcategory) = &source.subcategory {
        path = format!("{}/{}", path, slugify(subcategory));
        links.push(BreadcrumbLink {
            label: subcategory.clone(),
            path: path.clone(),
        });
    }

    links.push(BreadcrumbLink {
        label: leaf_label.to_string(),
        path: format!("{}/{}", path, source.slug),
    });

    Breadcrumb { links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueProvenance;
    use chrono::TimeZone;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_material() -> EnrichedMaterial {
        let property = EnrichedProperty {
            value: "7.9".to_string(),
            unit: "g/cm³".to_string(),
            min: None,
            max: None,
            out_of_range: false,
        };
        EnrichedMaterial {
            name: "Stainless Steel".to_string(),
            slug: "stainless-steel".to_string(),
            category: "Metal".to_string(),
            subcategory: Some("Ferrous".to_string()),
            title: "Stainless Steel Laser Cutting".to_string(),
            images: vec!["/images/stainless.jpg".to_string()],
            author: AuthorProfile {
                name: "M. Author".to_string(),
                country: "DE".to_string(),
                title: Some("Materials Engineer".to_string()),
            },
            narrative_sections: BTreeMap::from([(
                "overview".to_string(),
                "A corrosion resistant alloy.".to_string(),
            )]),
            material_challenges: Some("Heat-affected zones need managing.".to_string()),
            service_offering: Some("Cutting and engraving.".to_string()),
            material_properties: BTreeMap::from([("density".to_string(), property.clone())]),
            machine_settings: BTreeMap::from([("cuttingSpeed".to_string(), property.clone())]),
            thermal: ThermalBlock {
                diffusivity: property.clone(),
                conductivity: property.clone(),
                destruction_point: property.clone(),
                destruction_type: "melt".to_string(),
                provenance: ValueProvenance::Researched,
            },
            interaction: LaserInteractionBlock {
                damage_threshold: property.clone(),
                ablation_threshold: property,
                optimal_operating_window: None,
                provenance: ValueProvenance::CategoryDefault,
            },
            standards: vec![],
        }
    }

    fn stamp() -> RunStamp {
        RunStamp::new(
            Uuid::nil(),
            Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_both_views_share_identity_and_stamp() {
        let source = sample_material();
        let stamp = stamp();

        let primary = ViewKind::Primary.assemble(&source, &stamp);
        let settings = ViewKind::Settings.assemble(&source, &stamp);

        let primary = match primary {
            MaterialDocument::Primary(view) => view,
            _ => unreachable!(),
        };
        let settings = match settings {
            MaterialDocument::Settings(view) => view,
            _ => unreachable!(),
        };

        assert_eq!(primary.slug, settings.slug);
        assert_eq!(primary.audit_stamp, settings.audit_stamp);
        assert_eq!(primary.audit_stamp.generated_at, stamp.generated_at);
    }

    #[test]
    fn test_primary_breadcrumb_trail() {
        let source = sample_material();
        let breadcrumb = primary_breadcrumb(&source);
        let labels: Vec<&str> = breadcrumb.links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Materials", "Metal", "Ferrous", "Stainless Steel"]
        );
        assert_eq!(
            breadcrumb.links.last().unwrap().path,
            "/materials/metal/ferrous/stainless-steel"
        );
    }

    #[test]
    fn test_settings_breadcrumb_is_view_specific() {
        let source = sample_material();
        let breadcrumb = settings_breadcrumb(&source);
        assert_eq!(breadcrumb.links[0].label, "Laser Settings");
        assert_eq!(
            breadcrumb.links.last().unwrap().label,
            "Stainless Steel laser settings"
        );
        assert_eq!(
            breadcrumb.links.last().unwrap().path,
            "/laser-settings/metal/ferrous/stainless-steel"
        );
    }

    #[test]
    fn test_views_exclude_each_others_fields() {
        let source = sample_material();
        let stamp = stamp();

        let primary = serde_json::to_value(ViewKind::Primary.assemble(&source, &stamp)).unwrap();
        let settings = serde_json::to_value(ViewKind::Settings.assemble(&source, &stamp)).unwrap();

        let primary = &primary["material"];
        let settings = &settings["material"];

        assert!(primary.get("machineSettings").is_none());
        assert!(primary.get("materialProperties").is_some());
        assert!(settings.get("materialProperties").is_none());
        assert!(settings.get("thermalProperties").is_some());
    }
}
