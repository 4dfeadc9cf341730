//! Domain layer: errors, models, and port contracts.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
