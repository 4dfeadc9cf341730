//! MCP stdio server implementing JSON-RPC 2.0 over stdin/stdout.
//!
//! Exposes the directory operations as native tools via the MCP (Model
//! Context Protocol). Protocol: newline-delimited JSON-RPC 2.0 on
//! stdin/stdout. Logging goes to stderr (stdout is reserved for protocol
//! messages).
//!
//! Errors never cross this boundary as protocol faults: a failed tool call
//! becomes a text result with `isError: true`.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::domain::ports::{DirectoryApi, SearchFilter};
use crate::services::DirectoryService;

/// MCP stdio server over a [`DirectoryService`].
pub struct StdioServer<D: DirectoryApi> {
    service: Arc<DirectoryService<D>>,
}

impl<D: DirectoryApi + 'static> StdioServer<D> {
    pub fn new(service: Arc<DirectoryService<D>>) -> Self {
        Self { service }
    }

    /// Run the stdio server loop, reading JSON-RPC from stdin and writing
    /// responses to stdout.
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        eprintln!("[rolodex-mcp] stdio server started");

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = self.handle_message(line).await;
            if response.is_empty() {
                continue;
            }
            let mut response_bytes = response.into_bytes();
            response_bytes.push(b'\n');
            stdout.write_all(&response_bytes).await?;
            stdout.flush().await?;
        }

        eprintln!("[rolodex-mcp] stdio server stopped");
        Ok(())
    }

    /// Handle one JSON-RPC message and return the serialized response.
    /// Notifications return an empty string (no response is written).
    pub async fn handle_message(&self, line: &str) -> String {
        let request: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                return error_response(Value::Null, -32700, &format!("Parse error: {err}"));
            }
        };

        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = request.get("method").and_then(Value::as_str).unwrap_or("");
        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));

        match method {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, &params).await,
            // Client notification, no response required.
            "notifications/initialized" => String::new(),
            _ => error_response(id, -32601, &format!("Method not found: {method}")),
        }
    }

    fn handle_initialize(&self, id: Value) -> String {
        let result = json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "rolodex",
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        success_response(id, result)
    }

    fn handle_tools_list(&self, id: Value) -> String {
        let tools = json!({
            "tools": [
                {
                    "name": "people_search",
                    "description": "Search the employee directory with explicit fields and filters. Use employee_fields to discover available field paths. Filters support matching on root.id or root.email; to find someone by name, search with no filters and match the results yourself (or use employee_find). Set human_readable to \"REPLACE\" to translate list-field ids (e.g. work.title, work.department) into display names.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "fields": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "Field paths to return for each employee (e.g. root.fullName, work.title)"
                            },
                            "filters": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "fieldPath": { "type": "string", "description": "Field path to filter on, e.g. root.email" },
                                        "operator": { "type": "string", "description": "Filter operator, e.g. equals" },
                                        "values": { "type": "array", "description": "Values to match" }
                                    },
                                    "required": ["fieldPath", "operator", "values"]
                                },
                                "description": "Filter clauses; omit to return the whole roster"
                            },
                            "human_readable": { "type": "string", "description": "Pass \"REPLACE\" to resolve list-field ids into display names" }
                        }
                    }
                },
                {
                    "name": "employee_fields",
                    "description": "List metadata for every employee field in the directory. Use this to discover field paths for people_search fields and filters.",
                    "inputSchema": { "type": "object", "properties": {} }
                },
                {
                    "name": "employee_find",
                    "description": "Find employees by name or email substring against the cached roster. Returns a preformatted text block with one line per match.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "query": { "type": "string", "description": "Case-insensitive substring of the employee's name or email" }
                        },
                        "required": ["query"]
                    }
                },
                {
                    "name": "org_chart",
                    "description": "Render the company org chart from the cached roster as an indented text tree, one employee per line, children indented under their manager.",
                    "inputSchema": { "type": "object", "properties": {} }
                },
                {
                    "name": "whos_out",
                    "description": "List employees out of office in a date range. Defaults to today when no range is given.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "from": { "type": "string", "description": "Range start, YYYY-MM-DD (default: today)" },
                            "to": { "type": "string", "description": "Range end, YYYY-MM-DD (default: same as from)" }
                        }
                    }
                },
                {
                    "name": "employee_tasks",
                    "description": "List open tasks assigned to an employee.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "employee_id": { "type": "string", "description": "The employee's directory id" }
                        },
                        "required": ["employee_id"]
                    }
                },
                {
                    "name": "employee_update",
                    "description": "Update fields on an existing employee record. Keys are dotted field paths, e.g. {\"root.firstName\": \"NewName\"}. Use employee_fields to discover valid paths.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "employee_id": { "type": "string", "description": "The employee's directory id" },
                            "fields": { "type": "object", "description": "Field path to new value, e.g. {\"root.firstName\": \"NewName\"}" }
                        },
                        "required": ["employee_id", "fields"]
                    }
                },
                {
                    "name": "employee_create",
                    "description": "Create a new employee record. Keys are dotted field paths; site and start date are typically mandatory on the remote.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "fields": { "type": "object", "description": "Field path to value for the new record" }
                        },
                        "required": ["fields"]
                    }
                },
                {
                    "name": "timeoff_policy_types",
                    "description": "List the company's time-off policy type names.",
                    "inputSchema": { "type": "object", "properties": {} }
                },
                {
                    "name": "timeoff_submit",
                    "description": "Submit a time-off request for an employee. The request body follows the remote API contract (type, startDate, endDate, requestRangeType, startDatePortion, endDatePortion, ...).",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "employee_id": { "type": "string", "description": "The employee's directory id" },
                            "request": { "type": "object", "description": "Time-off request body as required by the remote API" }
                        },
                        "required": ["employee_id", "request"]
                    }
                }
            ]
        });
        success_response(id, tools)
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> String {
        let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let result = match tool_name {
            "people_search" => self.tool_people_search(&arguments).await,
            "employee_fields" => self.tool_employee_fields().await,
            "employee_find" => self.tool_employee_find(&arguments).await,
            "org_chart" => self.tool_org_chart().await,
            "whos_out" => self.tool_whos_out(&arguments).await,
            "employee_tasks" => self.tool_employee_tasks(&arguments).await,
            "employee_update" => self.tool_employee_update(&arguments).await,
            "employee_create" => self.tool_employee_create(&arguments).await,
            "timeoff_policy_types" => self.tool_timeoff_policy_types().await,
            "timeoff_submit" => self.tool_timeoff_submit(&arguments).await,
            _ => Err(format!("Unknown tool: {tool_name}")),
        };

        match result {
            Ok(content) => success_response(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": content
                    }]
                }),
            ),
            Err(error) => success_response(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": error
                    }],
                    "isError": true
                }),
            ),
        }
    }

    // ========================================================================
    // Tool implementations
    // ========================================================================

    async fn tool_people_search(&self, args: &Value) -> Result<String, String> {
        let fields: Vec<String> = args
            .get("fields")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|value| value.as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let filters: Vec<SearchFilter> = match args.get("filters") {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|err| format!("Invalid filters: {err}"))?,
            None => Vec::new(),
        };

        let human_readable = args.get("human_readable").and_then(Value::as_str);

        let result = self
            .service
            .people_search(fields, filters, human_readable)
            .await
            .map_err(|err| format!("People search failed: {err}"))?;
        serde_json::to_string_pretty(&result).map_err(|err| err.to_string())
    }

    async fn tool_employee_fields(&self) -> Result<String, String> {
        let result = self
            .service
            .employee_fields()
            .await
            .map_err(|err| format!("Field listing failed: {err}"))?;
        serde_json::to_string_pretty(&result).map_err(|err| err.to_string())
    }

    async fn tool_employee_find(&self, args: &Value) -> Result<String, String> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or("Missing required field: query")?;
        self.service
            .find_employee(query)
            .await
            .map_err(|err| format!("Employee lookup failed: {err}"))
    }

    async fn tool_org_chart(&self) -> Result<String, String> {
        self.service
            .org_chart()
            .await
            .map_err(|err| format!("Org chart failed: {err}"))
    }

    async fn tool_whos_out(&self, args: &Value) -> Result<String, String> {
        let from = parse_date(args, "from")?;
        let to = parse_date(args, "to")?;
        self.service
            .whos_out(from, to)
            .await
            .map_err(|err| format!("Who's-out lookup failed: {err}"))
    }

    async fn tool_employee_tasks(&self, args: &Value) -> Result<String, String> {
        let employee_id = args
            .get("employee_id")
            .and_then(Value::as_str)
            .ok_or("Missing required field: employee_id")?;
        self.service
            .employee_tasks(employee_id)
            .await
            .map_err(|err| format!("Task listing failed: {err}"))
    }

    async fn tool_employee_update(&self, args: &Value) -> Result<String, String> {
        let employee_id = args
            .get("employee_id")
            .and_then(Value::as_str)
            .ok_or("Missing required field: employee_id")?;
        let fields = object_argument(args, "fields")?;
        let result = self
            .service
            .update_employee(employee_id, &fields)
            .await
            .map_err(|err| format!("Employee update failed: {err}"))?;
        serde_json::to_string_pretty(&result).map_err(|err| err.to_string())
    }

    async fn tool_employee_create(&self, args: &Value) -> Result<String, String> {
        let fields = object_argument(args, "fields")?;
        let result = self
            .service
            .create_employee(&fields)
            .await
            .map_err(|err| format!("Employee create failed: {err}"))?;
        serde_json::to_string_pretty(&result).map_err(|err| err.to_string())
    }

    async fn tool_timeoff_policy_types(&self) -> Result<String, String> {
        let result = self
            .service
            .timeoff_policy_types()
            .await
            .map_err(|err| format!("Policy type listing failed: {err}"))?;
        serde_json::to_string_pretty(&result).map_err(|err| err.to_string())
    }

    async fn tool_timeoff_submit(&self, args: &Value) -> Result<String, String> {
        let employee_id = args
            .get("employee_id")
            .and_then(Value::as_str)
            .ok_or("Missing required field: employee_id")?;
        let request = args
            .get("request")
            .ok_or("Missing required field: request")?;
        let result = self
            .service
            .submit_timeoff_request(employee_id, request)
            .await
            .map_err(|err| format!("Time-off request failed: {err}"))?;
        serde_json::to_string_pretty(&result).map_err(|err| err.to_string())
    }
}

fn object_argument(args: &Value, key: &str) -> Result<Map<String, Value>, String> {
    args.get(key)
        .ok_or_else(|| format!("Missing required field: {key}"))?
        .as_object()
        .cloned()
        .ok_or_else(|| format!("Field {key} must be an object"))
}

fn parse_date(args: &Value, key: &str) -> Result<Option<NaiveDate>, String> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid {key} date '{raw}', expected YYYY-MM-DD")),
    }
}

// ============================================================================
// JSON-RPC helpers
// ============================================================================

fn success_response(id: Value, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
    .to_string()
}

fn error_response(id: Value, code: i32, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
    .to_string()
}
