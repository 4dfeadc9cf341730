//! Port trait definitions (hexagonal architecture).
//!
//! Ports are the contracts the domain depends on; adapters in
//! `crate::adapters` implement them against real infrastructure.

pub mod directory;

pub use directory::{DirectoryApi, PeopleSearchRequest, PeopleSearchResponse, SearchFilter};
