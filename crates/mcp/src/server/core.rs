//! MCP tool router over the Airflow client.
//!
//! One handler type carries the complete tool catalog; every transport
//! (stdio, streamable HTTP) serves a clone of it, so tools are registered in
//! exactly one place.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};

use airflow_api::{AirflowClient, ClientError};

use crate::server::schemas::{
    DagRequest, DagRunLogsRequest, DagRunRequest, ListDagRunsRequest, ListDagsRequest, TailDagRunRequest,
    TaskInstanceRequest, TaskLogsRequest, TriggerDagRequest,
};
use crate::server::tools;

fn tool_error(error: ClientError) -> ErrorData {
    ErrorData::internal_error(error.to_string(), None)
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// MCP server handler exposing the Airflow tool catalog.
#[derive(Clone)]
pub struct AirflowMcpServer {
    client: Arc<AirflowClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AirflowMcpServer {
    /// Create a handler around a configured client.
    pub fn new(client: Arc<AirflowClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// The injected client, shared with the serverless shim.
    pub fn client(&self) -> Arc<AirflowClient> {
        Arc::clone(&self.client)
    }

    #[tool(
        name = "airflow_list_dags",
        annotations(read_only_hint = true),
        description = "List all DAGs in Airflow"
    )]
    async fn list_dags(&self, param: Parameters<ListDagsRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::list_dags(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_get_dag",
        annotations(read_only_hint = true),
        description = "Get details of a specific DAG"
    )]
    async fn get_dag(&self, param: Parameters<DagRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::get_dag(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(name = "airflow_trigger_dag", description = "Trigger a DAG run")]
    async fn trigger_dag(&self, param: Parameters<TriggerDagRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::trigger_dag(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_list_dag_runs",
        annotations(read_only_hint = true),
        description = "List DAG runs for a specific DAG"
    )]
    async fn list_dag_runs(&self, param: Parameters<ListDagRunsRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::list_dag_runs(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_get_dag_run",
        annotations(read_only_hint = true),
        description = "Get details of a specific DAG run"
    )]
    async fn get_dag_run(&self, param: Parameters<DagRunRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::get_dag_run(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_list_task_instances",
        annotations(read_only_hint = true),
        description = "List task instances for a DAG run"
    )]
    async fn list_task_instances(&self, param: Parameters<DagRunRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::list_task_instances(&self.client, &param.0)
            .await
            .map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_get_task_instance",
        annotations(read_only_hint = true),
        description = "Get details of a specific task instance"
    )]
    async fn get_task_instance(&self, param: Parameters<TaskInstanceRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::get_task_instance(&self.client, &param.0)
            .await
            .map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(name = "airflow_pause_dag", description = "Pause a DAG")]
    async fn pause_dag(&self, param: Parameters<DagRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::set_dag_paused(&self.client, &param.0, true)
            .await
            .map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(name = "airflow_unpause_dag", description = "Unpause a DAG")]
    async fn unpause_dag(&self, param: Parameters<DagRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::set_dag_paused(&self.client, &param.0, false)
            .await
            .map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_get_task_logs",
        annotations(read_only_hint = true),
        description = "Get logs for a specific task instance"
    )]
    async fn get_task_logs(&self, param: Parameters<TaskLogsRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::get_task_logs(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_get_dag_run_logs",
        annotations(read_only_hint = true),
        description = "Get logs for all tasks in a DAG run"
    )]
    async fn get_dag_run_logs(&self, param: Parameters<DagRunLogsRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::get_dag_run_logs(&self.client, &param.0)
            .await
            .map_err(tool_error)?;
        Ok(text_result(text))
    }

    #[tool(
        name = "airflow_tail_dag_run",
        annotations(read_only_hint = true),
        description = "Tail/monitor a DAG run showing recent activity and logs"
    )]
    async fn tail_dag_run(&self, param: Parameters<TailDagRunRequest>) -> Result<CallToolResult, ErrorData> {
        let text = tools::tail_dag_run(&self.client, &param.0).await.map_err(tool_error)?;
        Ok(text_result(text))
    }
}

#[tool_handler]
impl ServerHandler for AirflowMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "airflow-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Airflow MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Tools for inspecting and operating an Apache Airflow deployment.\n\
                 Discovery: airflow_list_dags, then airflow_get_dag for details.\n\
                 Execution: airflow_trigger_dag starts a run; airflow_list_dag_runs and \
                 airflow_get_dag_run report run state.\n\
                 Debugging: airflow_list_task_instances -> airflow_get_task_instance -> \
                 airflow_get_task_logs; airflow_get_dag_run_logs aggregates all tasks, \
                 airflow_tail_dag_run shows recent activity with log tails.\n\
                 Scheduling: airflow_pause_dag / airflow_unpause_dag."
                    .to_string(),
            ),
        }
    }
}
