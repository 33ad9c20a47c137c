use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{
    EnrichedProperty, LaserInteractionBlock, OperatingWindow, RawPropertyValue, ThermalBlock,
    ValueProvenance,
};
use crate::pipeline::enrich::{NormalizedProperty, RangeEnricher};
use crate::pipeline::units::{
    format_value, temperature_to_kelvin, CONDUCTIVITY_UNIT, DIFFUSIVITY_UNIT, FLUENCE_UNIT,
    TEMPERATURE_UNIT,
};
use crate::registry::thermal::ThermalDefaults;

/// Multiplier on the ablation threshold for the window's lower bound.
const WINDOW_LOWER_FACTOR: f64 = 1.2;
/// Multiplier on the damage threshold for the window's upper bound.
const WINDOW_UPPER_FACTOR: f64 = 0.8;

/// Property names the synthesizer consumes from the laser-interaction group.
pub const DIFFUSIVITY_PROPERTY: &str = "thermalDiffusivity";
pub const CONDUCTIVITY_PROPERTY: &str = "thermalConductivity";
pub const DESTRUCTION_POINT_PROPERTY: &str = "destructionPoint";
pub const DESTRUCTION_TYPE_PROPERTY: &str = "destructionType";
pub const DAMAGE_THRESHOLD_PROPERTY: &str = "damageThreshold";
pub const ABLATION_THRESHOLD_PROPERTY: &str = "ablationThreshold";

/// Fills missing laser-interaction values from the category default table
/// and derives the optimal operating window.
///
/// Researched data always wins; defaults are a last-resort substitute and
/// the block provenance flags make every substitution visible in the
/// output.
pub struct ThermalSynthesizer<'a> {
    defaults: &'a ThermalDefaults,
    enricher: &'a RangeEnricher<'a>,
}

/// The two settings-view blocks produced per material.
pub struct ThermalOutputs {
    pub thermal: ThermalBlock,
    pub interaction: LaserInteractionBlock,
}

impl<'a> ThermalSynthesizer<'a> {
    pub fn new(defaults: &'a ThermalDefaults, enricher: &'a RangeEnricher<'a>) -> Self {
        Self { defaults, enricher }
    }

    pub fn synthesize(
        &self,
        category: &str,
        subcategory: Option<&str>,
        researched: &BTreeMap<String, RawPropertyValue>,
    ) -> ThermalOutputs {
        let diffusivity = self.researched_numeric(category, DIFFUSIVITY_PROPERTY, researched);
        let conductivity = self.researched_numeric(category, CONDUCTIVITY_PROPERTY, researched);
        let destruction_point = self.researched_temperature(category, researched);
        let destruction_type = researched_text(researched, DESTRUCTION_TYPE_PROPERTY);
        let damage = self.researched_numeric(category, DAMAGE_THRESHOLD_PROPERTY, researched);
        let ablation = self.researched_numeric(category, ABLATION_THRESHOLD_PROPERTY, researched);

        let thermal_researched = diffusivity.is_some()
            && conductivity.is_some()
            && destruction_point.is_some()
            && destruction_type.is_some();
        let interaction_researched = damage.is_some() && ablation.is_some();

        // Resolve defaults once, only when something needs filling.
        let (row, row_provenance) = self.defaults.resolve(category, subcategory);

        let thermal = ThermalBlock {
            diffusivity: match diffusivity {
                Some(ref p) => p.enriched.clone(),
                None => plain_property(row.diffusivity, DIFFUSIVITY_UNIT),
            },
            conductivity: match conductivity {
                Some(ref p) => p.enriched.clone(),
                None => plain_property(row.conductivity, CONDUCTIVITY_UNIT),
            },
            destruction_point: match destruction_point {
                Some(ref p) => p.clone(),
                None => {
                    // Default rows store °C
                    let kelvin = row.destruction_point + 273.15;
                    plain_property(kelvin, TEMPERATURE_UNIT)
                }
            },
            destruction_type: destruction_type
                .unwrap_or_else(|| row.destruction_type.clone()),
            provenance: if thermal_researched {
                ValueProvenance::Researched
            } else {
                row_provenance
            },
        };

        let damage_numeric = damage
            .as_ref()
            .map(|p| p.numeric)
            .unwrap_or(row.damage_threshold);
        let ablation_numeric = ablation
            .as_ref()
            .map(|p| p.numeric)
            .unwrap_or(row.ablation_threshold);

        let interaction = LaserInteractionBlock {
            damage_threshold: match damage {
                Some(ref p) => p.enriched.clone(),
                None => plain_property(row.damage_threshold, FLUENCE_UNIT),
            },
            ablation_threshold: match ablation {
                Some(ref p) => p.enriched.clone(),
                None => plain_property(row.ablation_threshold, FLUENCE_UNIT),
            },
            optimal_operating_window: operating_window(ablation_numeric, damage_numeric),
            provenance: if interaction_researched {
                ValueProvenance::Researched
            } else {
                row_provenance
            },
        };

        ThermalOutputs {
            thermal,
            interaction,
        }
    }

    fn researched_numeric(
        &self,
        category: &str,
        property: &str,
        researched: &BTreeMap<String, RawPropertyValue>,
    ) -> Option<NormalizedProperty> {
        let raw = researched.get(property)?;
        match self.enricher.enrich(category, property, raw) {
            Ok(normalized) => Some(normalized),
            Err(err) => {
                warn!(property, %err, "research value unusable; falling back to defaults");
                None
            }
        }
    }

    /// Destruction point is the one field whose canonicalization is a shift
    /// rather than a scale: the settings view requires Kelvin.
    fn researched_temperature(
        &self,
        category: &str,
        researched: &BTreeMap<String, RawPropertyValue>,
    ) -> Option<EnrichedProperty> {
        let raw = researched.get(DESTRUCTION_POINT_PROPERTY)?;
        let extracted = match self
            .enricher
            .extract(category, DESTRUCTION_POINT_PROPERTY, raw)
        {
            Ok(extracted) => extracted,
            Err(err) => {
                warn!(property = DESTRUCTION_POINT_PROPERTY, %err, "research value unusable; falling back to defaults");
                return None;
            }
        };

        let kelvin = match temperature_to_kelvin(extracted.value, extracted.unit.as_deref()) {
            Some(kelvin) => kelvin,
            None => {
                warn!(
                    property = DESTRUCTION_POINT_PROPERTY,
                    unit = extracted.unit.as_deref().unwrap_or(""),
                    "unrecognized temperature unit; value kept as Kelvin"
                );
                extracted.value
            }
        };

        // Explicit bounds share the value's unit; the category table is
        // already in Kelvin.
        let convert = |v: f64| {
            temperature_to_kelvin(v, extracted.unit.as_deref()).unwrap_or(v)
        };
        let (min, max) = if extracted.min.is_some() || extracted.max.is_some() {
            (extracted.min.map(convert), extracted.max.map(convert))
        } else {
            match self
                .enricher
                .envelope(category, DESTRUCTION_POINT_PROPERTY)
            {
                Some(envelope) => (envelope.min, envelope.max),
                None => (None, None),
            }
        };

        let out_of_range = min.is_some_and(|m| kelvin < m) || max.is_some_and(|m| kelvin > m);
        if out_of_range {
            warn!(
                property = DESTRUCTION_POINT_PROPERTY,
                category,
                value = kelvin,
                "property value outside its min/max envelope; reporting, not clamping"
            );
        }

        Some(EnrichedProperty {
            value: format_value(kelvin),
            unit: TEMPERATURE_UNIT.to_string(),
            min: min.map(format_value),
            max: max.map(format_value),
            out_of_range,
        })
    }
}

fn researched_text(
    researched: &BTreeMap<String, RawPropertyValue>,
    property: &str,
) -> Option<String> {
    match researched.get(property)? {
        RawPropertyValue::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn plain_property(value: f64, unit: &str) -> EnrichedProperty {
    EnrichedProperty {
        value: format_value(value),
        unit: unit.to_string(),
        min: None,
        max: None,
        out_of_range: false,
    }
}

/// Derived optimal operating window. Omitted entirely when the computed
/// lower bound is not strictly below the upper bound.
fn operating_window(ablation_threshold: f64, damage_threshold: f64) -> Option<OperatingWindow> {
    let lower = ablation_threshold * WINDOW_LOWER_FACTOR;
    let upper = damage_threshold * WINDOW_UPPER_FACTOR;
    if lower < upper {
        Some(OperatingWindow {
            lower: format_value(lower),
            upper: format_value(upper),
            unit: FLUENCE_UNIT.to_string(),
        })
    } else {
        debug!(
            ablation_threshold,
            damage_threshold, "degenerate operating window omitted"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ranges::CategoryRangeRegistry;
    use crate::registry::thermal::ThermalDefaultRow;

    fn defaults() -> ThermalDefaults {
        ThermalDefaults::from_rows([(
            "metal".to_string(),
            None,
            ThermalDefaultRow {
                diffusivity: 4.2,
                conductivity: 16.2,
                destruction_point: 1400.0,
                destruction_type: "melt".to_string(),
                damage_threshold: 12.0,
                ablation_threshold: 2.5,
            },
        )])
    }

    #[test]
    fn test_operating_window_values() {
        let window = operating_window(2.0, 10.0).unwrap();
        assert_eq!(window.lower, "2.4");
        assert_eq!(window.upper, "8");
        assert_eq!(window.unit, FLUENCE_UNIT);
    }

    #[test]
    fn test_degenerate_window_is_omitted() {
        // 9.0 * 1.2 = 10.8 >= 10.0 * 0.8 = 8.0
        assert!(operating_window(9.0, 10.0).is_none());
        // equal bounds are also degenerate
        assert!(operating_window(10.0, 15.0).is_none());
    }

    #[test]
    fn test_researched_values_win_over_defaults() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);
        let defaults = defaults();
        let synthesizer = ThermalSynthesizer::new(&defaults, &enricher);

        let mut researched = BTreeMap::new();
        researched.insert(
            DAMAGE_THRESHOLD_PROPERTY.to_string(),
            RawPropertyValue::Text("20000 J/m²".to_string()),
        );
        researched.insert(
            ABLATION_THRESHOLD_PROPERTY.to_string(),
            RawPropertyValue::Number(0.5),
        );

        let outputs = synthesizer.synthesize("metal", None, &researched);
        assert_eq!(outputs.interaction.damage_threshold.value, "2");
        assert_eq!(outputs.interaction.ablation_threshold.value, "0.5");
        assert_eq!(outputs.interaction.provenance, ValueProvenance::Researched);

        // window from researched values: [0.6, 1.6]
        let window = outputs.interaction.optimal_operating_window.unwrap();
        assert_eq!(window.lower, "0.6");
        assert_eq!(window.upper, "1.6");

        // thermal side had no research, so it is flagged as substituted
        assert_eq!(
            outputs.thermal.provenance,
            ValueProvenance::CategoryDefault
        );
        assert_eq!(outputs.thermal.diffusivity.value, "4.2");
        assert_eq!(outputs.thermal.destruction_type, "melt");
        // default destruction point converted from °C
        assert_eq!(outputs.thermal.destruction_point.value, "1673");
        assert_eq!(outputs.thermal.destruction_point.unit, "K");
    }

    #[test]
    fn test_unknown_category_uses_last_resort() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);
        let defaults = defaults();
        let synthesizer = ThermalSynthesizer::new(&defaults, &enricher);

        let outputs = synthesizer.synthesize("aerogel", None, &BTreeMap::new());
        assert_eq!(
            outputs.thermal.provenance,
            ValueProvenance::LastResortDefault
        );
        assert_eq!(
            outputs.interaction.provenance,
            ValueProvenance::LastResortDefault
        );
    }

    #[test]
    fn test_researched_destruction_point_in_celsius() {
        let registry = CategoryRangeRegistry::default();
        let enricher = RangeEnricher::new(&registry);
        let defaults = defaults();
        let synthesizer = ThermalSynthesizer::new(&defaults, &enricher);

        let mut researched = BTreeMap::new();
        researched.insert(
            DESTRUCTION_POINT_PROPERTY.to_string(),
            RawPropertyValue::Text("660 °C".to_string()),
        );

        let outputs = synthesizer.synthesize("metal", None, &researched);
        assert_eq!(outputs.thermal.destruction_point.value, "933");
        assert_eq!(outputs.thermal.destruction_point.unit, "K");
    }
}
