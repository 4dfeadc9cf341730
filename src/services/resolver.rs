//! Enumeration-value resolution for employee records.
//!
//! Raw records carry opaque identifiers for list-typed fields; the resolver
//! rewrites them to human-readable display strings using the field schema
//! and named lists from the [`MetadataStore`]. Resolution is best-effort:
//! any metadata fetch failure degrades to "no resolution for that field"
//! and never surfaces to the caller.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use crate::domain::models::{scalar_to_string, EmployeeRecord, FieldPath};
use crate::domain::ports::DirectoryApi;
use crate::services::metadata_store::{Availability, MetadataStore};

/// Rewrites enumeration ids to display values, in place.
pub struct ValueResolver<D> {
    metadata: Arc<MetadataStore<D>>,
}

impl<D> Clone for ValueResolver<D> {
    fn clone(&self) -> Self {
        Self {
            metadata: Arc::clone(&self.metadata),
        }
    }
}

impl<D: DirectoryApi> ValueResolver<D> {
    /// Create a resolver over the given metadata store.
    pub fn new(metadata: Arc<MetadataStore<D>>) -> Self {
        Self { metadata }
    }

    /// Resolve enumeration fields of `records` restricted to
    /// `requested_fields`, mutating the records in place.
    ///
    /// Calling with no records or no requested fields is a no-op, and the
    /// whole pass is idempotent: already-resolved display strings match no
    /// id and are left untouched.
    pub async fn resolve(&self, records: &mut [EmployeeRecord], requested_fields: &[String]) {
        if records.is_empty() || requested_fields.is_empty() {
            return;
        }

        let schema = match self.metadata.field_schema().await {
            Availability::Ready(schema) => schema,
            Availability::Unavailable => {
                tracing::debug!("field schema unavailable, skipping resolution");
                return;
            }
        };

        // Field id -> named list id, restricted to enumeration fields that
        // were actually requested.
        let requested: HashSet<&str> = requested_fields.iter().map(String::as_str).collect();
        let list_fields: Vec<(&str, &str)> = schema
            .iter()
            .filter(|entry| requested.contains(entry.id.as_str()))
            .filter_map(|entry| entry.named_list_id().map(|list_id| (entry.id.as_str(), list_id)))
            .collect();
        if list_fields.is_empty() {
            return;
        }

        // Global stringified item id -> display value, across every
        // referenced list. A failed list fetch contributes no entries.
        let list_ids: HashSet<&str> = list_fields.iter().map(|(_, list_id)| *list_id).collect();
        let mut id_to_display: HashMap<String, String> = HashMap::new();
        for list_id in list_ids {
            if let Availability::Ready(list) = self.metadata.named_list(list_id).await {
                for item in &list.values {
                    if let (Some(id), Some(display)) = (item.id_string(), item.display()) {
                        id_to_display.insert(id, display.to_string());
                    }
                }
            }
        }
        if id_to_display.is_empty() {
            return;
        }

        // Only two-segment field ids are addressable in records; anything
        // else stays raw.
        let paths: Vec<FieldPath> = list_fields
            .iter()
            .filter_map(|(field_id, _)| FieldPath::parse(field_id))
            .collect();

        for record in records.iter_mut() {
            for path in &paths {
                record.rewrite_field(path, |raw| {
                    scalar_to_string(raw)
                        .and_then(|key| id_to_display.get(&key))
                        .map(|display| Value::String(display.clone()))
                });
            }
        }
    }
}
