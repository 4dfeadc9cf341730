//! Integration tests for the MCP stdio server message handling.

use std::sync::Arc;

use serde_json::{json, Value};

use rolodex::adapters::mcp::StdioServer;
use rolodex::adapters::mock::MockDirectory;
use rolodex::domain::models::{CacheConfig, EmployeeRecord};
use rolodex::services::DirectoryService;

fn employee(value: Value) -> EmployeeRecord {
    EmployeeRecord::from_value(value).expect("record must be an object")
}

fn server_with(api: MockDirectory) -> StdioServer<MockDirectory> {
    let service = DirectoryService::new(Arc::new(api), &CacheConfig::default());
    StdioServer::new(Arc::new(service))
}

fn sample_roster() -> Vec<EmployeeRecord> {
    vec![
        employee(json!({
            "root": { "id": "1", "fullName": "Alice Adams", "email": "alice@example.com" },
            "work": { "title": "CEO" }
        })),
        employee(json!({
            "root": { "id": "2", "fullName": "Bob Brown", "email": "bob@example.com" },
            "work": { "title": "Engineer", "reportsTo": { "id": "1" } }
        })),
    ]
}

async fn call(server: &StdioServer<MockDirectory>, message: Value) -> Value {
    let response = server.handle_message(&message.to_string()).await;
    serde_json::from_str(&response).expect("response must be JSON")
}

fn result_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let server = server_with(MockDirectory::new());
    let response = call(
        &server,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }),
    )
    .await;

    assert_eq!(response["id"], json!(1));
    assert_eq!(response["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(response["result"]["serverInfo"]["name"], json!("rolodex"));
}

#[tokio::test]
async fn tools_list_exposes_every_tool() {
    let server = server_with(MockDirectory::new());
    let response = call(
        &server,
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
    )
    .await;

    let names: Vec<&str> = response["result"]["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();

    for expected in [
        "people_search",
        "employee_fields",
        "employee_find",
        "org_chart",
        "whos_out",
        "employee_tasks",
        "employee_update",
        "employee_create",
        "timeoff_policy_types",
        "timeoff_submit",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
    assert_eq!(names.len(), 10);
}

#[tokio::test]
async fn employee_find_returns_matches_as_text() {
    let server = server_with(MockDirectory::new().with_employees(sample_roster()));
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "employee_find", "arguments": { "query": "bob" } }
        }),
    )
    .await;

    let text = result_text(&response);
    assert!(text.starts_with("1 match(es) for 'bob':"));
    assert!(text.contains("Bob Brown"));
    assert!(text.contains("[id 2]"));
    assert!(response["result"].get("isError").is_none());
}

#[tokio::test]
async fn org_chart_renders_the_roster_tree() {
    let server = server_with(MockDirectory::new().with_employees(sample_roster()));
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "org_chart", "arguments": {} }
        }),
    )
    .await;

    let text = result_text(&response);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("Alice Adams"));
    assert!(lines[1].starts_with("  "));
    assert!(lines[1].contains("Bob Brown"));
}

#[tokio::test]
async fn whos_out_reports_an_empty_range() {
    let server = server_with(MockDirectory::new());
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": {
                "name": "whos_out",
                "arguments": { "from": "2026-08-24", "to": "2026-08-28" }
            }
        }),
    )
    .await;

    assert_eq!(
        result_text(&response),
        "Nobody is out between 2026-08-24 and 2026-08-28."
    );
}

#[tokio::test]
async fn invalid_dates_come_back_as_tool_errors() {
    let server = server_with(MockDirectory::new());
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "whos_out", "arguments": { "from": "yesterday" } }
        }),
    )
    .await;

    assert_eq!(response["result"]["isError"], json!(true));
    assert!(result_text(&response).contains("Invalid from date"));
}

#[tokio::test]
async fn failed_tool_calls_become_is_error_results() {
    let server = server_with(MockDirectory::new().failing_search());
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": "employee_find", "arguments": { "query": "bob" } }
        }),
    )
    .await;

    assert_eq!(response["result"]["isError"], json!(true));
    assert!(result_text(&response).contains("Employee lookup failed"));
}

#[tokio::test]
async fn unknown_tools_are_reported_in_band() {
    let server = server_with(MockDirectory::new());
    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": { "name": "no_such_tool", "arguments": {} }
        }),
    )
    .await;

    assert_eq!(response["result"]["isError"], json!(true));
    assert_eq!(result_text(&response), "Unknown tool: no_such_tool");
}

#[tokio::test]
async fn unknown_methods_return_method_not_found() {
    let server = server_with(MockDirectory::new());
    let response = call(
        &server,
        json!({ "jsonrpc": "2.0", "id": 9, "method": "resources/list" }),
    )
    .await;

    assert_eq!(response["error"]["code"], json!(-32601));
}

#[tokio::test]
async fn malformed_json_returns_a_parse_error() {
    let server = server_with(MockDirectory::new());
    let response = server.handle_message("{ not json").await;
    let response: Value = serde_json::from_str(&response).unwrap();

    assert_eq!(response["error"]["code"], json!(-32700));
    assert_eq!(response["id"], Value::Null);
}

#[tokio::test]
async fn initialized_notification_produces_no_response() {
    let server = server_with(MockDirectory::new());
    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(response.is_empty());
}

#[tokio::test]
async fn people_search_resolves_when_human_readable_is_set() {
    let api = MockDirectory::new()
        .with_field_schema(vec![MockDirectory::list_field("work.title", "titles")])
        .with_named_list("titles", &[("101", "Chief Executive Officer")])
        .with_employees(vec![employee(json!({
            "root": { "id": "1", "fullName": "Alice Adams" },
            "work": { "title": "101" }
        }))]);
    let server = server_with(api);

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 10,
            "method": "tools/call",
            "params": {
                "name": "people_search",
                "arguments": {
                    "fields": ["root.fullName", "work.title"],
                    "human_readable": "REPLACE"
                }
            }
        }),
    )
    .await;

    let text = result_text(&response);
    assert!(text.contains("Chief Executive Officer"));
    assert!(!text.contains("\"101\""));
}
