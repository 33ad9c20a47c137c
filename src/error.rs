use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No author registered for id '{author_id}' (material '{material}')")]
    MissingAuthor { material: String, author_id: String },

    #[error("Unparseable value '{raw}' for property '{property}'")]
    UnparseableValue { property: String, raw: String },

    #[error("Property '{0}' has no taxonomy mapping")]
    UnknownTaxonomy(String),

    #[error("Failed to write {document} for material '{material}': {source}")]
    OutputWrite {
        material: String,
        document: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
