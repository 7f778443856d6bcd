//! Task-instance operations: list and inspect.

use airflow_api::{AirflowClient, ClientError};

use crate::render;
use crate::server::schemas::{DagRunRequest, TaskInstanceRequest};

/// List task instances for one run.
pub async fn list_task_instances(client: &AirflowClient, request: &DagRunRequest) -> Result<String, ClientError> {
    let tasks = client.list_task_instances(&request.dag_id, &request.dag_run_id).await?;
    Ok(render::task_instance_list(
        &request.dag_id,
        &request.dag_run_id,
        &tasks.task_instances,
    ))
}

/// Fetch one task instance's details.
pub async fn get_task_instance(client: &AirflowClient, request: &TaskInstanceRequest) -> Result<String, ClientError> {
    let task = client
        .get_task_instance(&request.dag_id, &request.dag_run_id, &request.task_id)
        .await?;
    Ok(render::task_instance_details(&task))
}
