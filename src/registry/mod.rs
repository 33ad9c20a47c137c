// Read-only reference tables, loaded once per batch run.

pub mod ranges;
pub mod standards_bodies;
pub mod taxonomy;
pub mod thermal;

pub use ranges::{CategoryRangeRegistry, RangeEnvelope};
pub use standards_bodies::{find_body, StandardsBody};
pub use taxonomy::PropertyTaxonomy;
pub use thermal::{ThermalDefaultRow, ThermalDefaults};
