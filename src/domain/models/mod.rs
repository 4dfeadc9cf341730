//! Domain models for the rolodex directory layer.

pub mod config;
pub mod employee;
pub mod schema;

pub use config::{ApiConfig, CacheConfig, Config, LoggingConfig};
pub use employee::{scalar_to_string, EmployeeRecord, FieldPath};
pub use schema::{FieldSchemaEntry, FieldType, NamedList, NamedListItem, TypeData};
