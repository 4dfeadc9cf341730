//! Time-bounded cache of the resolved employee roster.
//!
//! A single-slot, whole-roster snapshot. A fresh snapshot is served without
//! a remote call; a missing or stale one triggers a synchronous refresh
//! (search, then enumeration resolution) before anything is returned, so a
//! returned snapshot is never older than the TTL. The slot mutex is held
//! across the refresh: at most one remote refresh runs at a time and other
//! callers wait for it instead of duplicating it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::errors::DomainResult;
use crate::domain::models::EmployeeRecord;
use crate::domain::ports::{DirectoryApi, PeopleSearchRequest};
use crate::services::resolver::ValueResolver;

/// Standard field set requested for every roster snapshot.
pub const ROSTER_FIELDS: [&str; 7] = [
    "root.id",
    "root.fullName",
    "root.email",
    "work.title",
    "work.department",
    "work.site",
    "work.reportsTo",
];

const DEFAULT_ROSTER_TTL: Duration = Duration::from_secs(300);

struct Snapshot {
    records: Arc<Vec<EmployeeRecord>>,
    fetched_at: Instant,
}

/// Single-slot TTL cache of the resolved roster.
pub struct RosterCache<D> {
    api: Arc<D>,
    resolver: ValueResolver<D>,
    ttl: Duration,
    slot: Mutex<Option<Snapshot>>,
}

impl<D: DirectoryApi> RosterCache<D> {
    /// Create a cache with the default 300 second TTL.
    pub fn new(api: Arc<D>, resolver: ValueResolver<D>) -> Self {
        Self::with_ttl(api, resolver, DEFAULT_ROSTER_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(api: Arc<D>, resolver: ValueResolver<D>, ttl: Duration) -> Self {
        Self {
            api,
            resolver,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// The current roster, refreshed first if missing or stale.
    ///
    /// A failed refresh propagates as an error and leaves the slot
    /// untouched; stale data is never served.
    pub async fn roster(&self) -> DomainResult<Arc<Vec<EmployeeRecord>>> {
        let mut slot = self.slot.lock().await;
        if let Some(snapshot) = slot.as_ref() {
            if snapshot.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&snapshot.records));
            }
        }

        let fields: Vec<String> = ROSTER_FIELDS.iter().map(ToString::to_string).collect();
        let request = PeopleSearchRequest::with_fields(fields.iter().cloned());
        let response = self.api.search_people(&request).await?;

        let mut records = response.employees;
        self.resolver.resolve(&mut records, &fields).await;

        let records = Arc::new(records);
        tracing::debug!(employees = records.len(), "roster snapshot refreshed");
        *slot = Some(Snapshot {
            records: Arc::clone(&records),
            fetched_at: Instant::now(),
        });
        Ok(records)
    }

    /// Drop the cached snapshot. Test support.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }
}
