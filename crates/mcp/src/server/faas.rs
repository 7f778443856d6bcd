//! Reduced JSON-RPC shim for function-as-a-service deployments.
//!
//! Some hosting environments cannot mount the full streamable-HTTP
//! transport; this module hand-rolls the minimal request/response subset an
//! MCP client needs to talk to the tool surface. The boundary contract is
//! deliberately small and is documented here rather than reconciled with the
//! full transport's session semantics:
//!
//! - supported methods: `initialize`, `tools/list`, `tools/call`; anything
//!   else answers `-32601 Method not found`
//! - supported tools: the five read-and-trigger operations listed in
//!   [`tool_catalog`]; `tools/list` and `tools/call` agree on this set
//! - a body that is not valid JSON is rejected with a 400-style response
//!   before any tool logic runs

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use schemars::schema_for;
use serde_json::{Value, json};

use airflow_api::AirflowClient;

use crate::server::schemas::{DagRequest, ListDagRunsRequest, ListDagsRequest, TaskLogsRequest, TriggerDagRequest};
use crate::server::tools;

/// MCP protocol revision the shim reports during `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// A transport-agnostic response: HTTP-ish status plus a JSON body.
#[derive(Debug, Clone)]
pub struct ShimResponse {
    pub status: u16,
    pub body: Value,
}

impl ShimResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn bad_request(body: Value) -> Self {
        Self { status: 400, body }
    }
}

/// The shim's tool surface: name, description, input schema.
pub fn tool_catalog() -> Vec<Value> {
    let entry = |name: &str, description: &str, schema: Value| {
        json!({ "name": name, "description": description, "inputSchema": schema })
    };
    vec![
        entry(
            "airflow_list_dags",
            "List all DAGs in Airflow",
            json!(schema_for!(ListDagsRequest)),
        ),
        entry(
            "airflow_get_dag",
            "Get details of a specific DAG",
            json!(schema_for!(DagRequest)),
        ),
        entry(
            "airflow_trigger_dag",
            "Trigger a DAG run",
            json!(schema_for!(TriggerDagRequest)),
        ),
        entry(
            "airflow_list_dag_runs",
            "List DAG runs for a specific DAG",
            json!(schema_for!(ListDagRunsRequest)),
        ),
        entry(
            "airflow_get_task_logs",
            "Get logs for a specific task instance",
            json!(schema_for!(TaskLogsRequest)),
        ),
    ]
}

/// Handle one raw request body.
pub async fn handle_request(client: &AirflowClient, raw_body: &str) -> ShimResponse {
    let envelope: Value = match serde_json::from_str(raw_body) {
        Ok(envelope) => envelope,
        Err(_) => return ShimResponse::bad_request(json!({ "error": "Invalid JSON" })),
    };

    let id = envelope.get("id").cloned().unwrap_or(Value::Null);
    let method = envelope.get("method").and_then(Value::as_str).unwrap_or_default();

    match method {
        "initialize" => ShimResponse::ok(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": true } },
                "serverInfo": {
                    "name": "airflow-mcp",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            },
        })),
        "tools/list" => ShimResponse::ok(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": { "tools": tool_catalog() },
        })),
        "tools/call" => {
            let params = envelope.get("params").cloned().unwrap_or_default();
            let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
            let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
            match call_tool(client, name, arguments).await {
                Ok(text) => ShimResponse::ok(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": { "content": [{ "type": "text", "text": text }] },
                })),
                Err((code, message)) => ShimResponse::ok(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": code, "message": message },
                })),
            }
        }
        _ => ShimResponse::ok(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": "Method not found" },
        })),
    }
}

/// Dispatch a `tools/call` to the shared operation functions.
///
/// Malformed arguments answer `-32602`; upstream and unknown-tool failures
/// answer `-32000`.
async fn call_tool(client: &AirflowClient, name: &str, arguments: Value) -> Result<String, (i64, String)> {
    fn parse<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, (i64, String)> {
        serde_json::from_value(arguments).map_err(|error| (-32602, format!("Invalid arguments: {error}")))
    }
    let upstream = |error: airflow_api::ClientError| (-32000, error.to_string());

    match name {
        "airflow_list_dags" => {
            let request: ListDagsRequest = parse(arguments)?;
            tools::list_dags(client, &request).await.map_err(upstream)
        }
        "airflow_get_dag" => {
            let request: DagRequest = parse(arguments)?;
            tools::get_dag(client, &request).await.map_err(upstream)
        }
        "airflow_trigger_dag" => {
            let request: TriggerDagRequest = parse(arguments)?;
            tools::trigger_dag(client, &request).await.map_err(upstream)
        }
        "airflow_list_dag_runs" => {
            let request: ListDagRunsRequest = parse(arguments)?;
            tools::list_dag_runs(client, &request).await.map_err(upstream)
        }
        "airflow_get_task_logs" => {
            let request: TaskLogsRequest = parse(arguments)?;
            tools::get_task_logs(client, &request).await.map_err(upstream)
        }
        _ => Err((-32000, format!("Unknown tool: {name}"))),
    }
}

/// Router hosting the shim: one POST endpoint plus `/health`.
pub fn router(client: Arc<AirflowClient>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", post(handle))
        .with_state(client)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "airflow-mcp" }))
}

async fn handle(State(client): State<Arc<AirflowClient>>, body: String) -> impl IntoResponse {
    let response = handle_request(&client, &body).await;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use airflow_api::AirflowConfig;

    fn client() -> AirflowClient {
        let config = AirflowConfig::with_token("http://localhost:8080", "t").unwrap();
        AirflowClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_protocol_and_server() {
        let request = json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" });
        let response = handle_request(&client(), &request.to_string()).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body["id"], json!(1));
        assert_eq!(response.body["result"]["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(response.body["result"]["serverInfo"]["name"], json!("airflow-mcp"));
    }

    #[tokio::test]
    async fn tools_list_and_call_surfaces_agree() {
        let request = json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" });
        let response = handle_request(&client(), &request.to_string()).await;
        let tools = response.body["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|tool| tool["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "airflow_list_dags",
                "airflow_get_dag",
                "airflow_trigger_dag",
                "airflow_list_dag_runs",
                "airflow_get_task_logs",
            ]
        );
        for tool in tools {
            assert!(tool["inputSchema"].is_object());
        }
    }

    #[tokio::test]
    async fn invalid_json_is_rejected_before_tool_logic() {
        let response = handle_request(&client(), "{not json").await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({ "error": "Invalid JSON" }));
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let request = json!({ "jsonrpc": "2.0", "id": 3, "method": "resources/list" });
        let response = handle_request(&client(), &request.to_string()).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body["error"]["code"], json!(-32601));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_tool_level_error() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "airflow_delete_everything", "arguments": {} },
        });
        let response = handle_request(&client(), &request.to_string()).await;
        assert_eq!(response.body["error"]["code"], json!(-32000));
        assert_eq!(
            response.body["error"]["message"],
            json!("Unknown tool: airflow_delete_everything")
        );
    }

    #[tokio::test]
    async fn malformed_arguments_are_invalid_params() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "airflow_get_dag", "arguments": { "dag_id": 42 } },
        });
        let response = handle_request(&client(), &request.to_string()).await;
        assert_eq!(response.body["error"]["code"], json!(-32602));
    }
}
