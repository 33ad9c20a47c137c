pub mod authors;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod sink;

// Domain data shapes shared across layers
pub mod domain;

pub use error::{PipelineError, Result};
pub use pipeline::{process_material, run_batch, EntityOutcome, ExportStatus, PipelineContext};
