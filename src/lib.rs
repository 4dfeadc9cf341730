//! Rolodex - read-through caching layer for an HR directory API.
//!
//! Rolodex sits in front of a remote HR directory service and answers
//! high-level queries (find an employee, render the org chart, who is out
//! today) by translating them into remote calls, resolving opaque
//! enumeration identifiers into display values, reconciling the two record
//! encodings the remote can return, and rebuilding the organization tree
//! from flat manager references. The operations are exposed as MCP tools
//! over stdio and as a small CLI.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and port contracts
//! - **Service Layer** (`services`): caches, resolution, query surface
//! - **Adapters** (`adapters`): HTTP client, MCP stdio server, test mock
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{Config, EmployeeRecord, FieldPath, FieldSchemaEntry, NamedList};
pub use domain::ports::{DirectoryApi, PeopleSearchRequest, PeopleSearchResponse, SearchFilter};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Availability, DirectoryService, MetadataStore, RosterCache, ValueResolver};
