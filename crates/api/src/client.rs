//! Thin HTTP client over the Airflow REST API.
//!
//! One method per remote endpoint, all rooted at `{base_url}/api/v1`. The
//! client pre-configures the `Authorization` and `Content-Type` headers at
//! construction and normalizes non-2xx responses into
//! [`ClientError::Upstream`]. No retries, no caching.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::config::AirflowConfig;
use crate::error::{ClientError, ConfigError};
use crate::types::{
    Dag, DagCollection, DagRun, DagRunCollection, PageParams, TaskInstance, TaskInstanceCollection, TaskLogs,
};

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configured client for one Airflow deployment.
#[derive(Debug, Clone)]
pub struct AirflowClient {
    api_root: String,
    http: Client,
}

impl AirflowClient {
    /// Build a client from a connection configuration.
    ///
    /// The credential mode decides the `Authorization` default header:
    /// `Bearer {token}` for token configs, `Basic {base64(user:pass)}` for
    /// username/password configs.
    pub fn new(config: AirflowConfig) -> Result<Self, ConfigError> {
        let mut default_headers = header::HeaderMap::new();
        let mut authorization = header::HeaderValue::from_str(&config.credentials.authorization_header())?;
        authorization.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            api_root: config.api_root(),
            http,
        })
    }

    /// Build a request for a method and API-relative endpoint.
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_root, endpoint);
        debug!(%url, "building request");
        self.http.request(method, url)
    }

    /// Execute a request and deserialize a 2xx JSON response.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::upstream(status, body));
        }
        Ok(response.json::<T>().await?)
    }

    /// `GET /dags` with optional limit/offset/order_by pagination.
    pub async fn list_dags(&self, page: &PageParams) -> Result<DagCollection, ClientError> {
        self.send(self.request(Method::GET, "/dags").query(&page.query_pairs()))
            .await
    }

    /// `GET /dags/{id}`.
    pub async fn get_dag(&self, dag_id: &str) -> Result<Dag, ClientError> {
        self.send(self.request(Method::GET, &format!("/dags/{dag_id}"))).await
    }

    /// `POST /dags/{id}/dagRuns`.
    ///
    /// Both the custom run id and the configuration payload are optional;
    /// with neither present the request body is the empty object `{}`.
    pub async fn trigger_dag_run(
        &self,
        dag_id: &str,
        dag_run_id: Option<&str>,
        conf: Option<&Value>,
    ) -> Result<DagRun, ClientError> {
        let payload = trigger_payload(dag_run_id, conf);
        self.send(
            self.request(Method::POST, &format!("/dags/{dag_id}/dagRuns"))
                .json(&payload),
        )
        .await
    }

    /// `GET /dags/{id}/dagRuns` with optional pagination.
    pub async fn list_dag_runs(&self, dag_id: &str, page: &PageParams) -> Result<DagRunCollection, ClientError> {
        self.send(
            self.request(Method::GET, &format!("/dags/{dag_id}/dagRuns"))
                .query(&page.query_pairs()),
        )
        .await
    }

    /// `GET /dags/{id}/dagRuns/{runId}`.
    pub async fn get_dag_run(&self, dag_id: &str, dag_run_id: &str) -> Result<DagRun, ClientError> {
        self.send(self.request(Method::GET, &format!("/dags/{dag_id}/dagRuns/{dag_run_id}")))
            .await
    }

    /// `GET /dags/{id}/dagRuns/{runId}/taskInstances`.
    pub async fn list_task_instances(
        &self,
        dag_id: &str,
        dag_run_id: &str,
    ) -> Result<TaskInstanceCollection, ClientError> {
        self.send(self.request(
            Method::GET,
            &format!("/dags/{dag_id}/dagRuns/{dag_run_id}/taskInstances"),
        ))
        .await
    }

    /// `GET /dags/{id}/dagRuns/{runId}/taskInstances/{taskId}`.
    pub async fn get_task_instance(
        &self,
        dag_id: &str,
        dag_run_id: &str,
        task_id: &str,
    ) -> Result<TaskInstance, ClientError> {
        self.send(self.request(
            Method::GET,
            &format!("/dags/{dag_id}/dagRuns/{dag_run_id}/taskInstances/{task_id}"),
        ))
        .await
    }

    /// `PATCH /dags/{id}?update_mask=is_paused`. Idempotent; covers both
    /// pause and unpause.
    pub async fn set_dag_paused(&self, dag_id: &str, paused: bool) -> Result<Dag, ClientError> {
        self.send(
            self.request(Method::PATCH, &format!("/dags/{dag_id}"))
                .query(&[("update_mask", "is_paused")])
                .json(&json!({ "is_paused": paused })),
        )
        .await
    }

    /// `GET /dags/{id}/dagRuns/{runId}/taskInstances/{taskId}/logs/{tryNumber}`.
    pub async fn get_task_logs(
        &self,
        dag_id: &str,
        dag_run_id: &str,
        task_id: &str,
        try_number: u32,
        full_content: bool,
    ) -> Result<TaskLogs, ClientError> {
        self.send(
            self.request(
                Method::GET,
                &format!("/dags/{dag_id}/dagRuns/{dag_run_id}/taskInstances/{task_id}/logs/{try_number}"),
            )
            .query(&[("full_content", full_content.to_string())]),
        )
        .await
    }
}

/// Build the body for a trigger request from the optional parts.
fn trigger_payload(dag_run_id: Option<&str>, conf: Option<&Value>) -> Value {
    let mut payload = Map::new();
    if let Some(dag_run_id) = dag_run_id {
        payload.insert("dag_run_id".to_string(), Value::String(dag_run_id.to_string()));
    }
    if let Some(conf) = conf {
        payload.insert("conf".to_string(), conf.clone());
    }
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AirflowConfig;

    fn client() -> AirflowClient {
        let config = AirflowConfig::with_token("http://localhost:8080", "t").unwrap();
        AirflowClient::new(config).unwrap()
    }

    #[test]
    fn trigger_payload_defaults_to_empty_object() {
        assert_eq!(trigger_payload(None, None), json!({}));
    }

    #[test]
    fn trigger_payload_includes_provided_parts() {
        let conf = json!({"target": "staging"});
        assert_eq!(
            trigger_payload(Some("manual__2024-01-01"), Some(&conf)),
            json!({"dag_run_id": "manual__2024-01-01", "conf": {"target": "staging"}})
        );
    }

    #[test]
    fn requests_target_the_versioned_api_root() {
        let request = client().request(Method::GET, "/dags/etl_pipeline").build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/v1/dags/etl_pipeline");
    }

    #[test]
    fn pagination_pairs_land_in_the_query_string() {
        let page = PageParams {
            limit: Some(5),
            offset: None,
            order_by: Some("dag_id".into()),
        };
        let request = client()
            .request(Method::GET, "/dags")
            .query(&page.query_pairs())
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/v1/dags?limit=5&order_by=dag_id"
        );
    }

    #[test]
    fn omitted_pagination_leaves_query_empty() {
        let request = client()
            .request(Method::GET, "/dags")
            .query(&PageParams::default().query_pairs())
            .build()
            .unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn pause_request_carries_update_mask() {
        let request = client()
            .request(Method::PATCH, "/dags/etl_pipeline")
            .query(&[("update_mask", "is_paused")])
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("update_mask=is_paused"));
    }
}
