//! Log operations: single attempt, aggregate per run, and tail.
//!
//! The aggregate operations fan out to one log fetch per task. Sub-requests
//! run sequentially, and a failing fetch is folded into the output as an
//! inline error section so one unavailable log never aborts the aggregate.

use tracing::debug;

use airflow_api::{AirflowClient, ClientError};

use crate::render::{self, TailLogOutcome, TailSection, TaskLogSection};
use crate::server::schemas::{DagRunLogsRequest, TailDagRunRequest, TaskLogsRequest};

/// Default attempt number when none is given.
const DEFAULT_TRY_NUMBER: u32 = 1;
/// Default task cap for the aggregate run-log view.
const DEFAULT_RUN_LOGS_LIMIT: usize = 10;
/// Default per-task line cap when tailing.
const DEFAULT_TAIL_LINES: usize = 50;

/// Fetch and decode one task attempt's log.
pub async fn get_task_logs(client: &AirflowClient, request: &TaskLogsRequest) -> Result<String, ClientError> {
    let try_number = request.task_try_number.unwrap_or(DEFAULT_TRY_NUMBER);
    let full_content = request.full_content.unwrap_or(true);
    let logs = client
        .get_task_logs(
            &request.dag_id,
            &request.dag_run_id,
            &request.task_id,
            try_number,
            full_content,
        )
        .await?;
    let content = render::unescape_log_content(logs.content.as_deref().unwrap_or_default());
    Ok(render::task_logs(
        &request.dag_id,
        &request.dag_run_id,
        &request.task_id,
        try_number,
        &content,
    ))
}

/// Fetch logs for up to `limit` task instances of one run.
pub async fn get_dag_run_logs(client: &AirflowClient, request: &DagRunLogsRequest) -> Result<String, ClientError> {
    let limit = request.limit.map(|limit| limit as usize).unwrap_or(DEFAULT_RUN_LOGS_LIMIT);
    let collection = client.list_task_instances(&request.dag_id, &request.dag_run_id).await?;
    let total = collection.task_instances.len();

    let mut sections = Vec::new();
    for task in collection.task_instances.iter().take(limit) {
        let outcome = match client
            .get_task_logs(&request.dag_id, &request.dag_run_id, &task.task_id, task.try_number, true)
            .await
        {
            Ok(logs) => Ok(render::unescape_log_content(logs.content.as_deref().unwrap_or_default())),
            Err(error) => {
                debug!(task_id = %task.task_id, %error, "log fetch failed, rendering inline");
                Err(error.to_string())
            }
        };
        sections.push(TaskLogSection {
            task_id: task.task_id.clone(),
            state: task.state.clone(),
            try_number: task.try_number,
            outcome,
        });
    }

    Ok(render::dag_run_logs(&request.dag_id, &request.dag_run_id, &sections, total))
}

/// Snapshot a run: status, the five most recently started tasks, and log
/// tails for the ones still running or freshly failed.
pub async fn tail_dag_run(client: &AirflowClient, request: &TailDagRunRequest) -> Result<String, ClientError> {
    let max_lines = request.max_lines.map(|lines| lines as usize).unwrap_or(DEFAULT_TAIL_LINES);
    let run = client.get_dag_run(&request.dag_id, &request.dag_run_id).await?;
    let collection = client.list_task_instances(&request.dag_id, &request.dag_run_id).await?;

    let mut sections = Vec::new();
    for task in render::select_recent_tasks(&collection.task_instances) {
        let wants_logs = matches!(task.state.as_deref(), Some("running") | Some("failed"));
        let logs = if wants_logs {
            Some(
                match client
                    .get_task_logs(&request.dag_id, &request.dag_run_id, &task.task_id, task.try_number, true)
                    .await
                {
                    Ok(logs) => {
                        let decoded = render::unescape_log_content(logs.content.as_deref().unwrap_or_default());
                        if decoded.trim().is_empty() {
                            TailLogOutcome::Empty
                        } else {
                            let (shown, text) = render::tail_lines(&decoded, max_lines);
                            TailLogOutcome::Tail { shown, text }
                        }
                    }
                    Err(error) => {
                        debug!(task_id = %task.task_id, %error, "log fetch failed, rendering inline");
                        TailLogOutcome::Error(error.to_string())
                    }
                },
            )
        } else {
            None
        };
        sections.push(TailSection {
            task_id: task.task_id.clone(),
            state: task.state.clone(),
            start_date: task.start_date.clone(),
            end_date: task.end_date.clone(),
            logs,
        });
    }

    let counts = render::state_counts(&collection.task_instances);
    Ok(render::tail_dag_run(
        &request.dag_id,
        &request.dag_run_id,
        &run,
        &sections,
        &counts,
    ))
}
