//! Request parameter schemas for the tool catalog.
//!
//! Each struct is the declared argument schema of one tool; the SDK layer
//! validates incoming arguments against it and rejects malformed calls as
//! invalid-params before any handler logic runs. Pagination fields stay
//! `Option` so an omitted value is omitted from the upstream query string
//! rather than sent as a default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for DAG listing.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Default)]
pub struct ListDagsRequest {
    #[schemars(description = "Maximum number of DAGs to return (default: 100)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of DAGs to skip")]
    pub offset: Option<u32>,
    #[schemars(description = "Field to order by (default: dag_id)")]
    pub order_by: Option<String>,
}

/// Parameters for tools addressing one DAG.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct DagRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
}

/// Parameters for triggering a DAG run.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct TriggerDagRequest {
    #[schemars(description = "The ID of the DAG to trigger")]
    pub dag_id: String,
    #[schemars(description = "Custom run ID (optional)")]
    pub dag_run_id: Option<String>,
    #[schemars(description = "Configuration parameters for the DAG run")]
    pub conf: Option<Value>,
}

/// Parameters for listing runs of one DAG.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct ListDagRunsRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
    #[schemars(description = "Maximum number of runs to return (default: 25)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of runs to skip")]
    pub offset: Option<u32>,
}

/// Parameters for tools addressing one DAG run.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct DagRunRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
    #[schemars(description = "The ID of the DAG run")]
    pub dag_run_id: String,
}

/// Parameters for tools addressing one task instance.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct TaskInstanceRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
    #[schemars(description = "The ID of the DAG run")]
    pub dag_run_id: String,
    #[schemars(description = "The ID of the task")]
    pub task_id: String,
}

/// Parameters for fetching one task attempt's logs.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct TaskLogsRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
    #[schemars(description = "The ID of the DAG run")]
    pub dag_run_id: String,
    #[schemars(description = "The ID of the task")]
    pub task_id: String,
    #[schemars(description = "The try number of the task (default: 1)")]
    pub task_try_number: Option<u32>,
    #[schemars(description = "Whether to get full log content (default: true)")]
    pub full_content: Option<bool>,
}

/// Parameters for the aggregate run-log view.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct DagRunLogsRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
    #[schemars(description = "The ID of the DAG run")]
    pub dag_run_id: String,
    #[schemars(description = "Maximum number of tasks to show logs for (default: 10)")]
    pub limit: Option<u32>,
}

/// Parameters for tailing a DAG run.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone)]
pub struct TailDagRunRequest {
    #[schemars(description = "The ID of the DAG")]
    pub dag_id: String,
    #[schemars(description = "The ID of the DAG run")]
    pub dag_run_id: String,
    #[schemars(description = "Maximum number of log lines to show per task (default: 50)")]
    pub max_lines: Option<u32>,
}
