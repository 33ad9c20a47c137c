use tracing::warn;

use crate::domain::{EnrichedProperty, RawPropertyValue};
use crate::error::{PipelineError, Result};
use crate::pipeline::units::{
    diffusivity_scale, fluence_scale, format_value, parse_value_text, DIFFUSIVITY_UNIT,
    FLUENCE_UNIT,
};
use crate::registry::ranges::{CategoryRangeRegistry, RangeEnvelope};

/// Physical quantity classes that get a canonical-unit conversion. Anything
/// else passes through with its declared unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    Diffusivity,
    Fluence,
    Temperature,
    Generic,
}

pub fn quantity_kind(property: &str) -> QuantityKind {
    let name = property.to_lowercase();
    if name.contains("diffusivity") {
        QuantityKind::Diffusivity
    } else if name.contains("threshold") || name.contains("fluence") {
        QuantityKind::Fluence
    } else if name.contains("destructionpoint") {
        QuantityKind::Temperature
    } else {
        QuantityKind::Generic
    }
}

/// A raw value pulled apart into number, unit and any per-material bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue {
    pub value: f64,
    pub unit: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A property after unit normalization and range attachment. The numeric
/// value is kept alongside the display form for downstream derivations.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProperty {
    pub numeric: f64,
    pub enriched: EnrichedProperty,
}

/// Attaches min/max bounds to normalized properties.
///
/// Per-material bounds always outrank the category table; a property the
/// table does not cover simply stays unbounded. The registry itself is
/// never mutated.
pub struct RangeEnricher<'a> {
    ranges: &'a CategoryRangeRegistry,
}

impl<'a> RangeEnricher<'a> {
    pub fn new(ranges: &'a CategoryRangeRegistry) -> Self {
        Self { ranges }
    }

    pub fn envelope(&self, category: &str, property: &str) -> Option<&RangeEnvelope> {
        self.ranges.envelope_for(category, property)
    }

    /// Pull the numeric value, unit and explicit bounds out of a raw value.
    /// Text values that do not start with a number are an
    /// `UnparseableValue` error; the caller skips the property and logs.
    pub fn extract(
        &self,
        category: &str,
        property: &str,
        raw: &RawPropertyValue,
    ) -> Result<ExtractedValue> {
        let declared_unit = self
            .ranges
            .envelope_for(category, property)
            .and_then(|envelope| envelope.unit.clone());

        match raw {
            RawPropertyValue::Number(value) => Ok(ExtractedValue {
                value: *value,
                unit: declared_unit,
                min: None,
                max: None,
            }),
            RawPropertyValue::Text(text) => {
                let parsed =
                    parse_value_text(text).ok_or_else(|| PipelineError::UnparseableValue {
                        property: property.to_string(),
                        raw: text.clone(),
                    })?;
                Ok(ExtractedValue {
                    value: parsed.value,
                    unit: parsed.unit.or(declared_unit),
                    min: None,
                    max: None,
                })
            }
            RawPropertyValue::Detailed {
                value,
                unit,
                min,
                max,
                ..
            } => Ok(ExtractedValue {
                value: *value,
                unit: unit.clone().or(declared_unit),
                min: *min,
                max: *max,
            }),
        }
    }

    /// Normalize a raw value to its canonical unit and attach bounds.
    pub fn enrich(
        &self,
        category: &str,
        property: &str,
        raw: &RawPropertyValue,
    ) -> Result<NormalizedProperty> {
        let extracted = self.extract(category, property, raw)?;
        let unit_text = extracted.unit.clone().unwrap_or_default();

        let (scale, canonical_unit) = match quantity_kind(property) {
            QuantityKind::Diffusivity => (
                recognized_scale(property, &unit_text, diffusivity_scale),
                DIFFUSIVITY_UNIT.to_string(),
            ),
            QuantityKind::Fluence => (
                recognized_scale(property, &unit_text, fluence_scale),
                FLUENCE_UNIT.to_string(),
            ),
            // Temperature shifts are view-specific and handled by the
            // thermal synthesizer; everything else keeps its unit.
            QuantityKind::Temperature | QuantityKind::Generic => (1.0, unit_text.clone()),
        };

        let numeric = extracted.value * scale;
        // Explicit bounds arrive in the same unit as the value, so they get
        // the same conversion. Table bounds are already canonical.
        let explicit_min = extracted.min.map(|v| v * scale);
        let explicit_max = extracted.max.map(|v| v * scale);

        let envelope = self.ranges.envelope_for(category, property);
        let (min, max) = if explicit_min.is_some() || explicit_max.is_some() {
            (explicit_min, explicit_max)
        } else {
            match envelope {
                Some(envelope) => (envelope.min, envelope.max),
                None => (None, None),
            }
        };

        let out_of_range =
            min.is_some_and(|m| numeric < m) || max.is_some_and(|m| numeric > m);
        if out_of_range {
            warn!(
                property,
                category,
                value = numeric,
                "property value outside its min/max envelope; reporting, not clamping"
            );
        }

        Ok(NormalizedProperty {
            numeric,
            enriched: EnrichedProperty {
                value: format_value(numeric),
                unit: canonical_unit,
                min: min.map(format_value),
                max: max.map(format_value),
                out_of_range,
            },
        })
    }
}

/// Unrecognized units are kept at face value (record only) with a warning;
/// skipping the property entirely would be a silent data gap.
fn recognized_scale(property: &str, unit: &str, scale_of: fn(&str) -> Option<f64>) -> f64 {
    match scale_of(unit) {
        Some(scale) => scale,
        None => {
            warn!(property, unit, "unrecognized unit; value kept unconverted");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ranges::RangeEnvelope;
    use std::collections::HashMap;

    fn registry_with(property: &str, envelope: RangeEnvelope) -> CategoryRangeRegistry {
        let mut props = HashMap::new();
        props.insert(property.to_string(), envelope);
        let mut table = HashMap::new();
        table.insert("metal".to_string(), props);
        CategoryRangeRegistry::from_table(table).unwrap()
    }

    #[test]
    fn test_explicit_bounds_outrank_category_table() {
        let registry = registry_with(
            "density",
            RangeEnvelope {
                min: Some(0.0),
                max: Some(10.0),
                unit: Some("g/cm³".to_string()),
            },
        );
        let enricher = RangeEnricher::new(&registry);

        let raw = RawPropertyValue::Detailed {
            value: 3.0,
            unit: None,
            min: Some(1.0),
            max: Some(5.0),
            confidence: None,
            source: None,
        };
        let result = enricher.enrich("metal", "density", &raw).unwrap();
        assert_eq!(result.enriched.min.as_deref(), Some("1"));
        assert_eq!(result.enriched.max.as_deref(), Some("5"));
    }

    #[test]
    fn test_table_bounds_attach_when_no_explicit_bounds() {
        let registry = registry_with(
            "density",
            RangeEnvelope {
                min: Some(0.5),
                max: Some(22.6),
                unit: Some("g/cm³".to_string()),
            },
        );
        let enricher = RangeEnricher::new(&registry);

        let result = enricher
            .enrich("metal", "density", &RawPropertyValue::Number(7.85))
            .unwrap();
        assert_eq!(result.enriched.min.as_deref(), Some("0.5"));
        assert_eq!(result.enriched.max.as_deref(), Some("22.6"));
        assert_eq!(result.enriched.unit, "g/cm³");
        assert!(!result.enriched.out_of_range);
    }

    #[test]
    fn test_missing_range_is_not_an_error() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);

        let result = enricher
            .enrich("metal", "density", &RawPropertyValue::Number(7.85))
            .unwrap();
        assert!(result.enriched.min.is_none());
        assert!(result.enriched.max.is_none());
    }

    #[test]
    fn test_out_of_range_is_reported_not_clamped() {
        let registry = registry_with(
            "density",
            RangeEnvelope {
                min: Some(0.5),
                max: Some(5.0),
                unit: None,
            },
        );
        let enricher = RangeEnricher::new(&registry);

        let result = enricher
            .enrich("metal", "density", &RawPropertyValue::Number(7.87))
            .unwrap();
        assert!(result.enriched.out_of_range);
        assert_eq!(result.enriched.value, "7.9");
        assert_eq!(result.numeric, 7.87);
    }

    #[test]
    fn test_diffusivity_text_normalization() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);

        let raw = RawPropertyValue::Text("9.7 ×10⁻⁵ m²/s".to_string());
        let result = enricher.enrich("metal", "thermalDiffusivity", &raw).unwrap();
        assert_eq!(result.numeric, 97.0);
        assert_eq!(result.enriched.value, "97");
        assert_eq!(result.enriched.unit, "mm²/s");
    }

    #[test]
    fn test_fluence_bounds_scale_with_value() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);

        let raw = RawPropertyValue::Detailed {
            value: 20_000.0,
            unit: Some("J/m²".to_string()),
            min: Some(10_000.0),
            max: Some(50_000.0),
            confidence: None,
            source: None,
        };
        let result = enricher.enrich("metal", "damageThreshold", &raw).unwrap();
        assert_eq!(result.numeric, 2.0);
        assert_eq!(result.enriched.min.as_deref(), Some("1"));
        assert_eq!(result.enriched.max.as_deref(), Some("5"));
        assert_eq!(result.enriched.unit, "J/cm²");
    }

    #[test]
    fn test_unparseable_text_is_an_error() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);

        let raw = RawPropertyValue::Text("to be measured".to_string());
        let err = enricher.enrich("metal", "density", &raw).unwrap_err();
        assert!(matches!(err, PipelineError::UnparseableValue { .. }));
    }

    #[test]
    fn test_declared_unit_fallback_for_implausible_text() {
        let registry = registry_with(
            "density",
            RangeEnvelope {
                min: None,
                max: None,
                unit: Some("g/cm³".to_string()),
            },
        );
        let enricher = RangeEnricher::new(&registry);

        let raw = RawPropertyValue::Text("7.85 as quoted by the supplier".to_string());
        let result = enricher.enrich("metal", "density", &raw).unwrap();
        assert_eq!(result.enriched.unit, "g/cm³");
    }
}
