// Domain data shapes shared across pipeline stages.

pub mod material;
pub mod property;
pub mod standards;
pub mod views;

pub use material::{AuthorProfile, RawMaterialRecord, RawPropertyValue, RawStandard};
pub use property::{EnrichedProperty, TaxonomyGroup, ValueProvenance};
pub use standards::RegulatoryStandard;
pub use views::{
    AuditStamp, Breadcrumb, BreadcrumbLink, LaserInteractionBlock, MaterialDocument,
    OperatingWindow, PrimaryView, RunStamp, SettingsView, ThermalBlock,
};
