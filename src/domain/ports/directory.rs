//! Directory API port (hexagonal architecture).
//!
//! The domain depends on this trait, never on a concrete HTTP client. The
//! `adapters::http` module implements it against the remote service and
//! `adapters::mock` implements it in memory for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmployeeRecord, FieldSchemaEntry, NamedList};

/// One filter clause of a people search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Dotted field path to filter on, e.g. `root.email`.
    pub field_path: String,

    /// Filter operator, e.g. `equals`.
    pub operator: String,

    /// Values to match.
    pub values: Vec<Value>,
}

impl SearchFilter {
    /// An `equals` filter on a single value.
    pub fn equals(field_path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field_path: field_path.into(),
            operator: "equals".to_string(),
            values: vec![value.into()],
        }
    }
}

/// Body of the roster-search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeopleSearchRequest {
    /// Field paths to return per employee; the remote picks its own default
    /// set when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Filter clauses; an empty list returns the whole roster.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<SearchFilter>,
}

impl PeopleSearchRequest {
    /// A request returning the given fields for the whole roster.
    pub fn with_fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            filters: Vec::new(),
        }
    }
}

/// Response of the roster-search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeopleSearchResponse {
    /// Matching employee records.
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
}

/// Port trait for the remote HR directory service.
///
/// Implementations must be `Send + Sync`; methods take `&self` so callers
/// can issue concurrent requests. All failures (network, timeout, non-2xx)
/// surface as [`crate::domain::errors::DomainError`]; retry policy, if any,
/// belongs to the caller.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Fetch the field-schema listing.
    async fn fetch_field_schema(&self) -> DomainResult<Vec<FieldSchemaEntry>>;

    /// Fetch one named list by id.
    async fn fetch_named_list(&self, list_id: &str) -> DomainResult<NamedList>;

    /// Search the roster.
    async fn search_people(
        &self,
        request: &PeopleSearchRequest,
    ) -> DomainResult<PeopleSearchResponse>;

    /// Replace fields on an existing employee record.
    async fn update_employee(
        &self,
        employee_id: &str,
        fields: &Map<String, Value>,
    ) -> DomainResult<Value>;

    /// Create a new employee record.
    async fn create_employee(&self, fields: &Map<String, Value>) -> DomainResult<Value>;

    /// List employees out of office in the given date range.
    async fn whos_out(&self, from: NaiveDate, to: NaiveDate) -> DomainResult<Value>;

    /// List the company's time-off policy type names.
    async fn timeoff_policy_types(&self) -> DomainResult<Value>;

    /// Submit a time-off request for an employee.
    async fn submit_timeoff_request(
        &self,
        employee_id: &str,
        request: &Value,
    ) -> DomainResult<Value>;

    /// List open tasks assigned to an employee.
    async fn employee_tasks(&self, employee_id: &str) -> DomainResult<Value>;
}
