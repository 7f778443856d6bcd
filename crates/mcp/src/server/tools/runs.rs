//! DAG-run operations: trigger, list, inspect.

use airflow_api::{AirflowClient, ClientError, PageParams};

use crate::render;
use crate::server::schemas::{DagRunRequest, ListDagRunsRequest, TriggerDagRequest};

/// Trigger a new run, optionally with a custom run id and configuration.
pub async fn trigger_dag(client: &AirflowClient, request: &TriggerDagRequest) -> Result<String, ClientError> {
    let run = client
        .trigger_dag_run(&request.dag_id, request.dag_run_id.as_deref(), request.conf.as_ref())
        .await?;
    Ok(render::dag_run_triggered(&run))
}

/// List runs of one DAG with optional pagination.
pub async fn list_dag_runs(client: &AirflowClient, request: &ListDagRunsRequest) -> Result<String, ClientError> {
    let page = PageParams {
        limit: request.limit,
        offset: request.offset,
        order_by: None,
    };
    let runs = client.list_dag_runs(&request.dag_id, &page).await?;
    Ok(render::dag_run_list(&request.dag_id, &runs))
}

/// Fetch one run's details.
pub async fn get_dag_run(client: &AirflowClient, request: &DagRunRequest) -> Result<String, ClientError> {
    let run = client.get_dag_run(&request.dag_id, &request.dag_run_id).await?;
    Ok(render::dag_run_details(&run))
}
