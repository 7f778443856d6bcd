//! DAG-level operations: list, inspect, pause/unpause.

use airflow_api::{AirflowClient, ClientError, PageParams};

use crate::render;
use crate::server::schemas::{DagRequest, ListDagsRequest};

/// List DAGs with optional pagination and ordering.
pub async fn list_dags(client: &AirflowClient, request: &ListDagsRequest) -> Result<String, ClientError> {
    let page = PageParams {
        limit: request.limit,
        offset: request.offset,
        order_by: request.order_by.clone(),
    };
    let dags = client.list_dags(&page).await?;
    Ok(render::dag_list(&dags))
}

/// Fetch one DAG's details.
pub async fn get_dag(client: &AirflowClient, request: &DagRequest) -> Result<String, ClientError> {
    let dag = client.get_dag(&request.dag_id).await?;
    Ok(render::dag_details(&dag))
}

/// Pause or unpause a DAG. The PATCH is idempotent.
pub async fn set_dag_paused(
    client: &AirflowClient,
    request: &DagRequest,
    paused: bool,
) -> Result<String, ClientError> {
    client.set_dag_paused(&request.dag_id, paused).await?;
    Ok(render::pause_confirmation(&request.dag_id, paused))
}
