//! Query layer over the directory client and caches.
//!
//! Each operation here backs one MCP tool (or CLI command). Structured
//! queries return JSON; lookups return preformatted text blocks. Empty
//! results are explicit "nothing found" messages rather than errors, and
//! remote failures are plain [`DomainError`]s for the tool boundary to
//! render as text.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CacheConfig, EmployeeRecord};
use crate::domain::ports::{DirectoryApi, PeopleSearchRequest, SearchFilter};
use crate::services::metadata_store::MetadataStore;
use crate::services::org_chart::render_org_chart;
use crate::services::resolver::ValueResolver;
use crate::services::roster_cache::RosterCache;

/// High-level directory operations over a [`DirectoryApi`] implementation.
pub struct DirectoryService<D> {
    api: Arc<D>,
    resolver: ValueResolver<D>,
    roster: RosterCache<D>,
}

impl<D: DirectoryApi> DirectoryService<D> {
    /// Wire up the caches and resolver over the given client.
    pub fn new(api: Arc<D>, cache: &CacheConfig) -> Self {
        let metadata = Arc::new(MetadataStore::new(Arc::clone(&api)));
        let resolver = ValueResolver::new(metadata);
        let roster = RosterCache::with_ttl(
            Arc::clone(&api),
            resolver.clone(),
            Duration::from_secs(cache.roster_ttl_secs),
        );
        Self {
            api,
            resolver,
            roster,
        }
    }

    /// Search the roster with explicit fields and filters.
    ///
    /// When `human_readable` carries a non-empty marker and fields were
    /// requested, enumeration ids are resolved to display values and
    /// employees without a manager are sorted first so leadership stays
    /// visible when callers truncate the result.
    pub async fn people_search(
        &self,
        fields: Vec<String>,
        filters: Vec<SearchFilter>,
        human_readable: Option<&str>,
    ) -> DomainResult<Value> {
        let request = PeopleSearchRequest {
            fields: fields.clone(),
            filters,
        };
        let mut response = self.api.search_people(&request).await?;

        let resolve = human_readable.is_some_and(|marker| !marker.is_empty()) && !fields.is_empty();
        if resolve {
            self.resolver.resolve(&mut response.employees, &fields).await;
            response
                .employees
                .sort_by_key(|employee| usize::from(employee.manager_id().is_some()));
        }
        Ok(serde_json::to_value(&response)?)
    }

    /// The raw field-schema listing, for discovering filterable paths.
    pub async fn employee_fields(&self) -> DomainResult<Value> {
        let schema = self.api.fetch_field_schema().await?;
        Ok(serde_json::to_value(&schema)?)
    }

    /// Find employees whose name or email contains `query`, as a text block.
    pub async fn find_employee(&self, query: &str) -> DomainResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::InvalidInput("search query is empty".to_string()));
        }

        let roster = self.roster.roster().await?;
        let needle = query.to_lowercase();
        let mut matches: Vec<&EmployeeRecord> = roster
            .iter()
            .filter(|employee| {
                ["root.fullName", "root.email"].iter().any(|field_id| {
                    employee
                        .text(field_id)
                        .is_some_and(|value| value.to_lowercase().contains(&needle))
                })
            })
            .collect();

        if matches.is_empty() {
            return Ok(format!("No employees match '{query}'."));
        }
        matches.sort_by_key(|employee| (employee.display_line(), employee.id()));

        let mut lines = vec![format!("{} match(es) for '{query}':", matches.len())];
        for employee in matches {
            let id = employee.id().unwrap_or_else(|| "unknown id".to_string());
            lines.push(format!("- {} [id {}]", employee.display_line(), id));
        }
        Ok(lines.join("\n"))
    }

    /// The rendered org chart for the current roster.
    pub async fn org_chart(&self) -> DomainResult<String> {
        let roster = self.roster.roster().await?;
        if roster.is_empty() {
            return Ok("The roster is empty.".to_string());
        }
        Ok(render_org_chart(&roster))
    }

    /// Who is out of office in the given range (defaulting to today).
    pub async fn whos_out(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DomainResult<String> {
        let from = from.unwrap_or_else(|| Utc::now().date_naive());
        let to = to.unwrap_or(from);
        if to < from {
            return Err(DomainError::InvalidInput(format!(
                "date range ends before it starts: {from} to {to}"
            )));
        }

        let response = self.api.whos_out(from, to).await?;
        let outs = response
            .get("outs")
            .and_then(Value::as_array)
            .cloned()
            .or_else(|| response.as_array().cloned())
            .unwrap_or_default();

        if outs.is_empty() {
            return Ok(format!("Nobody is out between {from} and {to}."));
        }

        let mut lines = vec![format!("Out between {from} and {to}:")];
        for out in &outs {
            let name = text_field(out, &["employeeDisplayName", "employeeId"])
                .unwrap_or_else(|| "unknown employee".to_string());
            let policy = text_field(out, &["policyTypeDisplayName", "policyType"])
                .unwrap_or_else(|| "time off".to_string());
            let start = text_field(out, &["startDate"]).unwrap_or_default();
            let end = text_field(out, &["endDate"]).unwrap_or_default();
            if start.is_empty() && end.is_empty() {
                lines.push(format!("- {name}: {policy}"));
            } else {
                lines.push(format!("- {name}: {policy} ({start} to {end})"));
            }
        }
        Ok(lines.join("\n"))
    }

    /// Open tasks for an employee, as a text block.
    pub async fn employee_tasks(&self, employee_id: &str) -> DomainResult<String> {
        let employee_id = non_empty_id(employee_id)?;
        let response = self.api.employee_tasks(employee_id).await?;
        let tasks = response
            .get("tasks")
            .and_then(Value::as_array)
            .cloned()
            .or_else(|| response.as_array().cloned())
            .unwrap_or_default();

        if tasks.is_empty() {
            return Ok(format!("No open tasks for employee {employee_id}."));
        }

        let mut lines = vec![format!("Tasks for employee {employee_id}:")];
        for task in &tasks {
            let title =
                text_field(task, &["title", "name"]).unwrap_or_else(|| "(untitled)".to_string());
            let status = text_field(task, &["status"]);
            let due = text_field(task, &["dueDate"]);
            let mut line = format!("- {title}");
            if let Some(status) = status {
                line.push_str(&format!(" [{status}]"));
            }
            if let Some(due) = due {
                line.push_str(&format!(" due {due}"));
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// Replace fields on an employee record. Passthrough write.
    pub async fn update_employee(
        &self,
        employee_id: &str,
        fields: &Map<String, Value>,
    ) -> DomainResult<Value> {
        let employee_id = non_empty_id(employee_id)?;
        if fields.is_empty() {
            return Err(DomainError::InvalidInput("no fields to update".to_string()));
        }
        self.api.update_employee(employee_id, fields).await
    }

    /// Create a new employee record. Passthrough write.
    pub async fn create_employee(&self, fields: &Map<String, Value>) -> DomainResult<Value> {
        if fields.is_empty() {
            return Err(DomainError::InvalidInput(
                "no fields for the new employee".to_string(),
            ));
        }
        self.api.create_employee(fields).await
    }

    /// The company's time-off policy type names. Passthrough read.
    pub async fn timeoff_policy_types(&self) -> DomainResult<Value> {
        self.api.timeoff_policy_types().await
    }

    /// Submit a time-off request for an employee. Passthrough write.
    pub async fn submit_timeoff_request(
        &self,
        employee_id: &str,
        request: &Value,
    ) -> DomainResult<Value> {
        let employee_id = non_empty_id(employee_id)?;
        self.api.submit_timeoff_request(employee_id, request).await
    }
}

fn non_empty_id(employee_id: &str) -> DomainResult<&str> {
    let employee_id = employee_id.trim();
    if employee_id.is_empty() {
        return Err(DomainError::InvalidInput("employee id is empty".to_string()));
    }
    Ok(employee_id)
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(key)
            .and_then(crate::domain::models::scalar_to_string)
            .filter(|text| !text.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockDirectory;
    use serde_json::json;

    fn service_with(api: MockDirectory) -> DirectoryService<MockDirectory> {
        DirectoryService::new(Arc::new(api), &CacheConfig::default())
    }

    #[tokio::test]
    async fn policy_types_pass_through_unchanged() {
        let service = service_with(
            MockDirectory::new().with_policy_types(json!({ "policyTypes": ["Holiday", "Sick"] })),
        );
        let result = service.timeoff_policy_types().await.unwrap();
        assert_eq!(result, json!({ "policyTypes": ["Holiday", "Sick"] }));
    }

    #[tokio::test]
    async fn timeoff_submission_rejects_an_empty_id() {
        let service = service_with(MockDirectory::new());
        let result = service.submit_timeoff_request("  ", &json!({})).await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }
}
