//! Structure templates: registry, placement, stamping and marker processing

mod generator;
mod markers;
pub mod placement;
mod registry;
mod rotation;
mod stamp;
mod template;

pub use generator::{StructureGenerator, StructureSite};
pub use markers::{
    place_proximity_spawner, MarkerHit, MarkerKind, MarkerMap, MarkerProcessor, MarkerScan, ReplacementMap,
};
pub use placement::Placement;
pub use registry::{
    LoadReport, StructMeta, StructureCategory, StructureType, TemplateHolder, TemplateRegistry, TemplateTier,
};
pub use rotation::Rotation;
pub use stamp::{fill_below, stamp};
pub use template::{BlueprintFile, BlueprintTemplate, LocalMarker, PaletteDef, PlacedTemplate, TemplateBuilder};
