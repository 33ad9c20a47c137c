use serde::{Deserialize, Serialize};

/// A normalized regulatory standard ready for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulatoryStandard {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RegulatoryStandard {
    /// Whether the name slot is still open for enrichment. An
    /// already-populated name is never overwritten.
    pub fn name_is_placeholder(&self) -> bool {
        let trimmed = self.name.trim();
        trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown")
    }
}
