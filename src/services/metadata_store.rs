//! Process-lifetime metadata caches for field schemas and named lists.
//!
//! Both caches are monotonic: populated lazily on first access, never
//! evicted, never re-fetched. That includes a failed fetch, which is
//! cached as [`Availability::Unavailable`] so one slow failure bounds the
//! remote-call volume for the rest of the process lifetime. Schema changes
//! on the remote are only observed after a process restart; this is a
//! documented limitation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::models::{FieldSchemaEntry, NamedList};
use crate::domain::ports::DirectoryApi;

/// A cached fetch outcome: either the value or a typed marker that the
/// remote could not provide it.
///
/// Distinguishing "empty data" from "fetch failed" lets callers and tests
/// tell a legitimately empty schema apart from a degraded one.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    /// The fetch succeeded.
    Ready(T),
    /// The fetch failed; the failure itself is cached.
    Unavailable,
}

impl<T> Availability<T> {
    /// The value, if the fetch succeeded.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable => None,
        }
    }
}

/// Write-once-per-key cache of field schemas and named-list contents.
///
/// Each check-then-fill sequence runs under a mutex held across the remote
/// call, so at most one fetch per cache is in flight at a time and readers
/// never observe a partially populated entry.
pub struct MetadataStore<D> {
    api: Arc<D>,
    field_schema: Mutex<Option<Availability<Arc<Vec<FieldSchemaEntry>>>>>,
    named_lists: Mutex<HashMap<String, Availability<Arc<NamedList>>>>,
}

impl<D: DirectoryApi> MetadataStore<D> {
    /// Create an empty store over the given directory client.
    pub fn new(api: Arc<D>) -> Self {
        Self {
            api,
            field_schema: Mutex::new(None),
            named_lists: Mutex::new(HashMap::new()),
        }
    }

    /// The field-schema listing, fetched at most once per process lifetime.
    pub async fn field_schema(&self) -> Availability<Arc<Vec<FieldSchemaEntry>>> {
        let mut slot = self.field_schema.lock().await;
        if let Some(cached) = slot.as_ref() {
            return cached.clone();
        }
        let entry = match self.api.fetch_field_schema().await {
            Ok(schema) => Availability::Ready(Arc::new(schema)),
            Err(err) => {
                tracing::warn!(error = %err, "field schema fetch failed, caching as unavailable");
                Availability::Unavailable
            }
        };
        *slot = Some(entry.clone());
        entry
    }

    /// One named list by id, fetched at most once per distinct id.
    pub async fn named_list(&self, list_id: &str) -> Availability<Arc<NamedList>> {
        let mut lists = self.named_lists.lock().await;
        if let Some(cached) = lists.get(list_id) {
            return cached.clone();
        }
        let entry = match self.api.fetch_named_list(list_id).await {
            Ok(list) => Availability::Ready(Arc::new(list)),
            Err(err) => {
                tracing::warn!(
                    list_id,
                    error = %err,
                    "named list fetch failed, caching as unavailable"
                );
                Availability::Unavailable
            }
        };
        lists.insert(list_id.to_string(), entry.clone());
        entry
    }

    /// Drop all cached entries. Test support; production stores live for
    /// the whole process.
    pub async fn clear(&self) {
        *self.field_schema.lock().await = None;
        self.named_lists.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockDirectory;
    use crate::domain::models::{FieldSchemaEntry, FieldType};

    fn schema_entry(id: &str, field_type: FieldType) -> FieldSchemaEntry {
        FieldSchemaEntry {
            id: id.to_string(),
            field_type,
            type_data: None,
        }
    }

    #[tokio::test]
    async fn field_schema_is_fetched_once() {
        let api = Arc::new(
            MockDirectory::new()
                .with_field_schema(vec![schema_entry("root.email", FieldType::Other)]),
        );
        let store = MetadataStore::new(Arc::clone(&api));

        for _ in 0..4 {
            let schema = store.field_schema().await;
            assert_eq!(schema.ready().unwrap().len(), 1);
        }
        assert_eq!(api.field_schema_calls(), 1);
    }

    #[tokio::test]
    async fn failed_schema_fetch_is_cached_and_not_retried() {
        let api = Arc::new(MockDirectory::new().failing_field_schema());
        let store = MetadataStore::new(Arc::clone(&api));

        assert_eq!(store.field_schema().await, Availability::Unavailable);
        assert_eq!(store.field_schema().await, Availability::Unavailable);
        assert_eq!(api.field_schema_calls(), 1);
    }

    #[tokio::test]
    async fn named_lists_are_fetched_once_per_id() {
        let api = Arc::new(
            MockDirectory::new()
                .with_named_list("titles", &[("101", "CEO")])
                .with_named_list("sites", &[("7", "Berlin")]),
        );
        let store = MetadataStore::new(Arc::clone(&api));

        for _ in 0..3 {
            assert!(store.named_list("titles").await.ready().is_some());
            assert!(store.named_list("sites").await.ready().is_some());
        }
        assert_eq!(api.named_list_calls(), 2);
    }

    #[tokio::test]
    async fn clear_resets_the_store() {
        let api = Arc::new(MockDirectory::new().with_field_schema(vec![]));
        let store = MetadataStore::new(Arc::clone(&api));

        store.field_schema().await;
        store.clear().await;
        store.field_schema().await;
        assert_eq!(api.field_schema_calls(), 2);
    }
}
