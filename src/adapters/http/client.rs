//! HTTP client for the remote HR directory API.
//!
//! Wraps the directory's REST surface behind the [`DirectoryApi`] port.
//! Requests carry a bearer-like token sourced from the process environment
//! and a fixed request-source header. Non-2xx responses surface as
//! [`DomainError::ApiFailure`] with status and body; retry policy is left
//! to callers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ApiConfig, FieldSchemaEntry, NamedList};
use crate::domain::ports::{DirectoryApi, PeopleSearchRequest, PeopleSearchResponse};

const REQUEST_SOURCE: &str = "rolodex-mcp";

/// reqwest-backed implementation of the [`DirectoryApi`] port.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpDirectory {
    /// Create a client with an explicit base URL, token, and timeout.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DomainError::Transport(err.to_string()))?;
        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client from configuration, reading the API token from the
    /// environment variable the config names.
    pub fn from_env(config: &ApiConfig) -> DomainResult<Self> {
        let token = std::env::var(&config.token_env).map_err(|_| {
            DomainError::MissingToken(format!(
                "{} environment variable is not set",
                config.token_env
            ))
        })?;
        if token.is_empty() {
            return Err(DomainError::MissingToken(format!(
                "{} environment variable is empty",
                config.token_env
            )));
        }
        Self::new(
            config.base_url.clone(),
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, endpoint))
            .header("Authorization", format!("Basic {}", self.token))
            .header("Content-Type", "application/json")
            .header("X-Request-Source", REQUEST_SOURCE)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> DomainResult<T> {
        let body = self.execute_raw(request, what).await?;
        serde_json::from_str(&body)
            .map_err(|err| DomainError::MalformedResponse(format!("{what}: {err}")))
    }

    /// Like [`Self::execute`] but tolerant of empty bodies, which some
    /// write endpoints return on success.
    async fn execute_value(&self, request: RequestBuilder, what: &str) -> DomainResult<Value> {
        let body = self.execute_raw(request, what).await?;
        if body.trim().is_empty() {
            return Ok(json!({}));
        }
        serde_json::from_str(&body)
            .map_err(|err| DomainError::MalformedResponse(format!("{what}: {err}")))
    }

    async fn execute_raw(&self, request: RequestBuilder, what: &str) -> DomainResult<String> {
        let response = request
            .send()
            .await
            .map_err(|err| DomainError::Transport(format!("{what}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, what, "directory API call failed");
            return Err(DomainError::ApiFailure {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|err| DomainError::Transport(format!("{what}: {err}")))
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectory {
    async fn fetch_field_schema(&self) -> DomainResult<Vec<FieldSchemaEntry>> {
        let request = self.request(Method::GET, "company/people/fields");
        self.execute(request, "field schema").await
    }

    async fn fetch_named_list(&self, list_id: &str) -> DomainResult<NamedList> {
        let request = self.request(Method::GET, &format!("company/named-lists/{list_id}"));
        self.execute(request, "named list").await
    }

    async fn search_people(
        &self,
        request: &PeopleSearchRequest,
    ) -> DomainResult<PeopleSearchResponse> {
        let request = self.request(Method::POST, "people/search").json(request);
        self.execute(request, "people search").await
    }

    async fn update_employee(
        &self,
        employee_id: &str,
        fields: &Map<String, Value>,
    ) -> DomainResult<Value> {
        let request = self
            .request(Method::PUT, &format!("people/{employee_id}"))
            .json(fields);
        self.execute_value(request, "employee update").await
    }

    async fn create_employee(&self, fields: &Map<String, Value>) -> DomainResult<Value> {
        let request = self.request(Method::POST, "people").json(fields);
        self.execute_value(request, "employee create").await
    }

    async fn whos_out(&self, from: NaiveDate, to: NaiveDate) -> DomainResult<Value> {
        let request = self
            .request(Method::GET, "timeoff/whosout")
            .query(&[("from", from.to_string()), ("to", to.to_string())]);
        self.execute_value(request, "whos out").await
    }

    async fn timeoff_policy_types(&self) -> DomainResult<Value> {
        let request = self.request(Method::GET, "timeoff/policy-types");
        self.execute_value(request, "time-off policy types").await
    }

    async fn submit_timeoff_request(
        &self,
        employee_id: &str,
        request: &Value,
    ) -> DomainResult<Value> {
        let request = self
            .request(
                Method::POST,
                &format!("timeoff/employees/{employee_id}/requests"),
            )
            .json(request);
        self.execute_value(request, "time-off request").await
    }

    async fn employee_tasks(&self, employee_id: &str) -> DomainResult<Value> {
        let request = self.request(Method::GET, &format!("tasks/people/{employee_id}"));
        self.execute_value(request, "employee tasks").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_the_token() {
        let config = ApiConfig::default();
        temp_env::with_var_unset("ROLODEX_API_TOKEN", || {
            let result = HttpDirectory::from_env(&config);
            assert!(matches!(result, Err(DomainError::MissingToken(_))));
        });
        temp_env::with_var("ROLODEX_API_TOKEN", Some(""), || {
            let result = HttpDirectory::from_env(&config);
            assert!(matches!(result, Err(DomainError::MissingToken(_))));
        });
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            HttpDirectory::new("https://example.com/v1/", "tok", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://example.com/v1");
    }
}
