use std::collections::BTreeMap;
use tracing::{info, warn};

pub mod assemble;
pub mod enrich;
pub mod standards;
pub mod thermal;
pub mod units;

use crate::authors::AuthorRegistry;
use crate::config::TableConfig;
use crate::domain::views::slugify;
use crate::domain::{
    EnrichedProperty, MaterialDocument, RawMaterialRecord, RawPropertyValue, RunStamp,
    TaxonomyGroup,
};
use crate::error::{PipelineError, Result};
use crate::pipeline::assemble::{EnrichedMaterial, ViewKind};
use crate::pipeline::enrich::RangeEnricher;
use crate::pipeline::standards::normalize_standards;
use crate::pipeline::thermal::ThermalSynthesizer;
use crate::registry::ranges::CategoryRangeRegistry;
use crate::registry::taxonomy::PropertyTaxonomy;
use crate::registry::thermal::ThermalDefaults;
use crate::sink::DocumentSink;

/// Everything one batch run needs, constructed explicitly up front and
/// passed into every pipeline call. There is no process-wide cache; the
/// tables live exactly as long as the run.
pub struct PipelineContext<'a> {
    pub ranges: CategoryRangeRegistry,
    pub taxonomy: PropertyTaxonomy,
    pub thermal_defaults: ThermalDefaults,
    pub authors: &'a dyn AuthorRegistry,
    pub stamp: RunStamp,
}

impl<'a> PipelineContext<'a> {
    /// Assemble a context from already-loaded tables. The
    /// taxonomy-completeness check runs here, once, not per entity.
    pub fn new(
        ranges: CategoryRangeRegistry,
        taxonomy: PropertyTaxonomy,
        thermal_defaults: ThermalDefaults,
        authors: &'a dyn AuthorRegistry,
        stamp: RunStamp,
    ) -> Self {
        let unmapped = taxonomy.check_completeness(&ranges);
        if !unmapped.is_empty() {
            warn!(
                count = unmapped.len(),
                "range table properties without taxonomy mapping will never enrich"
            );
        }
        Self {
            ranges,
            taxonomy,
            thermal_defaults,
            authors,
            stamp,
        }
    }

    /// Load all three reference tables from their configured files.
    pub fn load_tables(
        tables: &TableConfig,
    ) -> Result<(CategoryRangeRegistry, PropertyTaxonomy, ThermalDefaults)> {
        let ranges = CategoryRangeRegistry::load(&tables.category_ranges)?;
        let taxonomy = PropertyTaxonomy::load(&tables.property_taxonomy)?;
        let defaults = ThermalDefaults::load(&tables.thermal_defaults)?;
        Ok((ranges, taxonomy, defaults))
    }
}

/// Outcome of one material's export. Failures are entity-scoped; the batch
/// report carries them instead of aborting the run.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityOutcome {
    pub material: String,
    pub status: ExportStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Exported,
    Failed { reason: String },
}

/// Run one material through enrichment and project it into its two
/// documents. The only hard failure here is a missing author.
pub fn process_material(
    ctx: &PipelineContext<'_>,
    record: &RawMaterialRecord,
) -> Result<Vec<MaterialDocument>> {
    let author =
        ctx.authors
            .lookup(&record.author_id)
            .ok_or_else(|| PipelineError::MissingAuthor {
                material: record.name.clone(),
                author_id: record.author_id.clone(),
            })?;

    let enricher = RangeEnricher::new(&ctx.ranges);
    let mut material_properties: BTreeMap<String, EnrichedProperty> = BTreeMap::new();
    let mut laser_properties: BTreeMap<String, RawPropertyValue> = BTreeMap::new();

    for (group, properties) in &record.property_groups {
        for (property, raw) in properties {
            match ctx.taxonomy.classify(property) {
                Some(TaxonomyGroup::GeneralCharacteristics) => {
                    match enricher.enrich(&record.category, property, raw) {
                        Ok(normalized) => {
                            material_properties.insert(property.clone(), normalized.enriched);
                        }
                        Err(err) => {
                            warn!(material = %record.name, %property, %err, "skipping property");
                        }
                    }
                }
                Some(TaxonomyGroup::LaserInteraction) => {
                    laser_properties.insert(property.clone(), raw.clone());
                }
                None => {
                    warn!(
                        material = %record.name,
                        %group,
                        %property,
                        "property has no taxonomy mapping; excluded from output"
                    );
                }
            }
        }
    }

    let mut machine_settings: BTreeMap<String, EnrichedProperty> = BTreeMap::new();
    for (setting, raw) in &record.machine_settings {
        match enricher.enrich(&record.category, setting, raw) {
            Ok(normalized) => {
                machine_settings.insert(setting.clone(), normalized.enriched);
            }
            Err(err) => {
                warn!(material = %record.name, %setting, %err, "skipping machine setting");
            }
        }
    }

    let synthesizer = ThermalSynthesizer::new(&ctx.thermal_defaults, &enricher);
    let outputs = synthesizer.synthesize(
        &record.category,
        record.subcategory.as_deref(),
        &laser_properties,
    );

    let enriched = EnrichedMaterial {
        name: record.name.clone(),
        slug: slugify(&record.name),
        category: record.category.clone(),
        subcategory: record.subcategory.clone(),
        title: record.title.clone(),
        images: record.images.clone(),
        author,
        narrative_sections: record.narrative_sections.clone(),
        material_challenges: record.material_challenges.clone(),
        service_offering: record.service_offering.clone(),
        material_properties,
        machine_settings,
        thermal: outputs.thermal,
        interaction: outputs.interaction,
        standards: normalize_standards(&record.standards),
    };

    Ok(ViewKind::ALL
        .iter()
        .map(|view| view.assemble(&enriched, &ctx.stamp))
        .collect())
}

/// Process a whole batch. Each material is independent: one bad record
/// never blocks the rest, and the caller may stop between entities with
/// every already-written document still valid.
pub fn run_batch(
    ctx: &PipelineContext<'_>,
    records: &[RawMaterialRecord],
    sink: &dyn DocumentSink,
) -> Vec<EntityOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let status = match export_material(ctx, record, sink) {
            Ok(()) => {
                info!(material = %record.name, "exported both documents");
                ExportStatus::Exported
            }
            Err(err) => {
                warn!(material = %record.name, %err, "material export failed");
                ExportStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        outcomes.push(EntityOutcome {
            material: record.name.clone(),
            status,
        });
    }

    outcomes
}

fn export_material(
    ctx: &PipelineContext<'_>,
    record: &RawMaterialRecord,
    sink: &dyn DocumentSink,
) -> Result<()> {
    let documents = process_material(ctx, record)?;
    for document in &documents {
        sink.write(&record.name, document)?;
    }
    Ok(())
}
