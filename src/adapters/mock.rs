//! Mock directory adapter for testing.
//!
//! An in-memory [`DirectoryApi`] with canned responses, per-endpoint failure
//! toggles, and call counters. The cache tests rely on the counters to
//! assert the monotonic and TTL properties.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    EmployeeRecord, FieldSchemaEntry, FieldType, NamedList, NamedListItem, TypeData,
};
use crate::domain::ports::{DirectoryApi, PeopleSearchRequest, PeopleSearchResponse};

/// In-memory mock of the remote directory service.
#[derive(Debug, Default)]
pub struct MockDirectory {
    field_schema: Vec<FieldSchemaEntry>,
    named_lists: HashMap<String, NamedList>,
    employees: Vec<EmployeeRecord>,
    whos_out: Option<Value>,
    tasks: Option<Value>,
    policy_types: Option<Value>,

    fail_field_schema: bool,
    fail_named_lists: bool,
    fail_search: bool,

    field_schema_calls: AtomicUsize,
    named_list_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl MockDirectory {
    /// An empty mock; every endpoint succeeds with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema entry for an enumeration field backed by `list_id`.
    pub fn list_field(id: &str, list_id: &str) -> FieldSchemaEntry {
        FieldSchemaEntry {
            id: id.to_string(),
            field_type: FieldType::List,
            type_data: Some(TypeData {
                list_id: Some(list_id.to_string()),
            }),
        }
    }

    /// Set the field-schema listing.
    pub fn with_field_schema(mut self, schema: Vec<FieldSchemaEntry>) -> Self {
        self.field_schema = schema;
        self
    }

    /// Add a named list of `(id, display value)` pairs.
    pub fn with_named_list(mut self, list_id: &str, items: &[(&str, &str)]) -> Self {
        let values = items
            .iter()
            .map(|(id, display)| NamedListItem {
                id: Value::String((*id).to_string()),
                value: Some((*display).to_string()),
                name: None,
            })
            .collect();
        self.named_lists
            .insert(list_id.to_string(), NamedList { values });
        self
    }

    /// Set the employees returned by every search.
    pub fn with_employees(mut self, employees: Vec<EmployeeRecord>) -> Self {
        self.employees = employees;
        self
    }

    /// Set the who's-out response.
    pub fn with_whos_out(mut self, response: Value) -> Self {
        self.whos_out = Some(response);
        self
    }

    /// Set the employee-tasks response.
    pub fn with_tasks(mut self, response: Value) -> Self {
        self.tasks = Some(response);
        self
    }

    /// Set the time-off policy types response.
    pub fn with_policy_types(mut self, response: Value) -> Self {
        self.policy_types = Some(response);
        self
    }

    /// Make field-schema fetches fail.
    pub fn failing_field_schema(mut self) -> Self {
        self.fail_field_schema = true;
        self
    }

    /// Make named-list fetches fail.
    pub fn failing_named_lists(mut self) -> Self {
        self.fail_named_lists = true;
        self
    }

    /// Make people searches fail.
    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Number of field-schema fetches issued so far.
    pub fn field_schema_calls(&self) -> usize {
        self.field_schema_calls.load(Ordering::SeqCst)
    }

    /// Number of named-list fetches issued so far.
    pub fn named_list_calls(&self) -> usize {
        self.named_list_calls.load(Ordering::SeqCst)
    }

    /// Number of people searches issued so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn failure(what: &str) -> DomainError {
        DomainError::Transport(format!("mock {what} failure"))
    }
}

#[async_trait]
impl DirectoryApi for MockDirectory {
    async fn fetch_field_schema(&self) -> DomainResult<Vec<FieldSchemaEntry>> {
        self.field_schema_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_field_schema {
            return Err(Self::failure("field schema"));
        }
        Ok(self.field_schema.clone())
    }

    async fn fetch_named_list(&self, list_id: &str) -> DomainResult<NamedList> {
        self.named_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_named_lists {
            return Err(Self::failure("named list"));
        }
        self.named_lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| DomainError::ApiFailure {
                status: 404,
                body: format!("named list {list_id} not found"),
            })
    }

    async fn search_people(
        &self,
        _request: &PeopleSearchRequest,
    ) -> DomainResult<PeopleSearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(Self::failure("search"));
        }
        Ok(PeopleSearchResponse {
            employees: self.employees.clone(),
        })
    }

    async fn update_employee(
        &self,
        employee_id: &str,
        fields: &Map<String, Value>,
    ) -> DomainResult<Value> {
        Ok(json!({ "updated": employee_id, "fields": fields }))
    }

    async fn create_employee(&self, fields: &Map<String, Value>) -> DomainResult<Value> {
        Ok(json!({ "created": fields }))
    }

    async fn whos_out(&self, _from: NaiveDate, _to: NaiveDate) -> DomainResult<Value> {
        Ok(self.whos_out.clone().unwrap_or_else(|| json!({ "outs": [] })))
    }

    async fn timeoff_policy_types(&self) -> DomainResult<Value> {
        Ok(self
            .policy_types
            .clone()
            .unwrap_or_else(|| json!({ "policyTypes": [] })))
    }

    async fn submit_timeoff_request(
        &self,
        employee_id: &str,
        request: &Value,
    ) -> DomainResult<Value> {
        Ok(json!({ "submitted": employee_id, "request": request }))
    }

    async fn employee_tasks(&self, _employee_id: &str) -> DomainResult<Value> {
        Ok(self.tasks.clone().unwrap_or_else(|| json!({ "tasks": [] })))
    }
}
