//! Service layer: caches, resolution, and the query surface.

pub mod directory_service;
pub mod metadata_store;
pub mod org_chart;
pub mod resolver;
pub mod roster_cache;

pub use directory_service::DirectoryService;
pub use metadata_store::{Availability, MetadataStore};
pub use org_chart::render_org_chart;
pub use resolver::ValueResolver;
pub use roster_cache::{RosterCache, ROSTER_FIELDS};
