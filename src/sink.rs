use std::fs;
use std::path::PathBuf;

use crate::domain::MaterialDocument;
use crate::error::{PipelineError, Result};

/// Destination for finished documents. A write failure is fatal for that
/// material only; the batch continues.
pub trait DocumentSink {
    fn write(&self, material: &str, document: &MaterialDocument) -> Result<()>;
}

/// Writes each document as pretty-printed JSON under the output directory,
/// named `<slug>.<kind>.json`.
#[derive(Debug)]
pub struct FsDocumentSink {
    root: PathBuf,
}

impl FsDocumentSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn wrap_io(&self, material: &str, document: &MaterialDocument, err: std::io::Error) -> PipelineError {
        PipelineError::OutputWrite {
            material: material.to_string(),
            document: document.document_kind().to_string(),
            source: err,
        }
    }
}

impl DocumentSink for FsDocumentSink {
    fn write(&self, material: &str, document: &MaterialDocument) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| self.wrap_io(material, document, e))?;

        let path = self
            .root
            .join(format!("{}.{}.json", document.slug(), document.document_kind()));
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&path, json).map_err(|e| self.wrap_io(material, document, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditStamp, AuthorProfile, Breadcrumb, PrimaryView};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn sample_document() -> MaterialDocument {
        MaterialDocument::Primary(PrimaryView {
            name: "Copper".to_string(),
            slug: "copper".to_string(),
            category: "metal".to_string(),
            subcategory: None,
            author: AuthorProfile {
                name: "A".to_string(),
                country: "DE".to_string(),
                title: None,
            },
            title: "Copper".to_string(),
            breadcrumb: Breadcrumb { links: vec![] },
            images: vec![],
            narrative_sections: BTreeMap::new(),
            regulatory_standards: vec![],
            material_properties: BTreeMap::new(),
            service_offering: None,
            audit_stamp: AuditStamp {
                run_id: Uuid::nil(),
                generated_at: Utc::now(),
                pipeline_version: "test".to_string(),
            },
        })
    }

    #[test]
    fn test_writes_named_document() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDocumentSink::new(dir.path());

        sink.write("Copper", &sample_document()).unwrap();

        let path = dir.path().join("copper.primary.json");
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("\"material\""));
        assert!(content.contains("\"slug\": \"copper\""));
    }

    #[test]
    fn test_write_failure_maps_to_output_write() {
        // A file where the directory should be forces the failure
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, b"not a directory").unwrap();

        let sink = FsDocumentSink::new(&blocked);
        let err = sink.write("Copper", &sample_document()).unwrap_err();
        assert!(matches!(err, PipelineError::OutputWrite { .. }));
    }
}
