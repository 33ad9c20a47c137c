use std::collections::HashSet;
use tracing::debug;

use crate::domain::{RawStandard, RegulatoryStandard};
use crate::registry::standards_bodies::find_body;

/// Normalize the heterogeneous raw standards list.
///
/// Plain-string legacy entries are dropped; structured entries are
/// deduplicated by description text (first occurrence wins, order
/// preserved) and enriched from the known-standards-body table when their
/// name slot is still open.
pub fn normalize_standards(raw: &[RawStandard]) -> Vec<RegulatoryStandard> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut normalized = Vec::new();

    for entry in raw {
        let (name, description, url, image) = match entry {
            RawStandard::Legacy(text) => {
                debug!(entry = %text, "dropping legacy plain-string standard");
                continue;
            }
            RawStandard::Structured {
                name,
                description,
                url,
                image,
            } => (
                name.clone().unwrap_or_default(),
                description.clone(),
                url.clone(),
                image.clone(),
            ),
        };

        if !seen.insert(description.clone()) {
            continue;
        }

        let mut standard = RegulatoryStandard {
            name,
            description,
            url,
            image,
        };
        enrich_from_known_bodies(&mut standard);
        normalized.push(standard);
    }

    normalized
}

/// Fill name/url/image from the known-bodies table. Gated on the name: an
/// already-populated name is never overwritten, and neither are the other
/// fields in that case.
fn enrich_from_known_bodies(standard: &mut RegulatoryStandard) {
    if !standard.name_is_placeholder() {
        return;
    }
    if let Some(body) = find_body(&standard.description) {
        standard.name = body.name.to_string();
        if standard.url.is_none() {
            standard.url = Some(body.url.to_string());
        }
        if standard.image.is_none() {
            standard.image = Some(body.image.to_string());
        }
    }
}
