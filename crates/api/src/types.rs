//! Read-only views of Airflow REST payloads.
//!
//! These are projections, not owned entities: fields the formatter never
//! consumes are simply not modeled, and unknown fields are ignored on
//! deserialization. Everything the engine may omit or null out is `Option`.

use serde::Deserialize;
use serde_json::Value;

/// Pagination and ordering parameters for list endpoints.
///
/// A query pair is emitted if and only if the field was explicitly provided;
/// omitted fields never appear in the query string.
#[derive(Debug, Clone, Default)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Option<String>,
}

impl PageParams {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(order_by) = self.order_by.as_ref() {
            pairs.push(("order_by", order_by.clone()));
        }
        pairs
    }
}

/// A DAG tag. The REST API wraps tag names in objects.
#[derive(Debug, Clone, Deserialize)]
pub struct DagTag {
    pub name: String,
}

/// A schedulable workflow definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Dag {
    pub dag_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_paused: bool,
    /// Either a cron string or a typed object, depending on engine version.
    #[serde(default)]
    pub schedule_interval: Option<Value>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub catchup: Option<bool>,
    #[serde(default)]
    pub max_active_runs: Option<i64>,
    #[serde(default)]
    pub tags: Vec<DagTag>,
}

/// Page of DAGs.
#[derive(Debug, Clone, Deserialize)]
pub struct DagCollection {
    #[serde(default)]
    pub dags: Vec<Dag>,
    #[serde(default)]
    pub total_entries: u64,
}

/// One execution instance of a DAG.
#[derive(Debug, Clone, Deserialize)]
pub struct DagRun {
    pub dag_run_id: String,
    #[serde(default)]
    pub dag_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub execution_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub external_trigger: Option<bool>,
    #[serde(default)]
    pub conf: Option<Value>,
}

/// Page of DAG runs.
#[derive(Debug, Clone, Deserialize)]
pub struct DagRunCollection {
    #[serde(default)]
    pub dag_runs: Vec<DagRun>,
    #[serde(default)]
    pub total_entries: u64,
}

/// One task's execution within a specific DAG run.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInstance {
    pub task_id: String,
    #[serde(default)]
    pub dag_id: Option<String>,
    #[serde(default)]
    pub dag_run_id: Option<String>,
    /// Null while the task is still queued.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Seconds, as reported by the engine.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub try_number: u32,
    #[serde(default)]
    pub max_tries: Option<i64>,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub priority_weight: Option<i64>,
}

/// Page of task instances.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInstanceCollection {
    #[serde(default)]
    pub task_instances: Vec<TaskInstance>,
    #[serde(default)]
    pub total_entries: u64,
}

/// Log payload for one task attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskLogs {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_included_iff_provided() {
        let empty = PageParams::default();
        assert!(empty.query_pairs().is_empty());

        let page = PageParams {
            limit: Some(25),
            offset: None,
            order_by: Some("dag_id".into()),
        };
        assert_eq!(
            page.query_pairs(),
            vec![("limit", "25".to_string()), ("order_by", "dag_id".to_string())]
        );
    }

    #[test]
    fn zero_is_still_an_explicit_value() {
        let page = PageParams {
            limit: None,
            offset: Some(0),
            order_by: None,
        };
        assert_eq!(page.query_pairs(), vec![("offset", "0".to_string())]);
    }

    #[test]
    fn dag_deserializes_from_engine_payload() {
        let dag: Dag = serde_json::from_str(
            r#"{
                "dag_id": "etl_pipeline",
                "description": null,
                "is_paused": true,
                "schedule_interval": {"__type": "CronExpression", "value": "0 0 * * *"},
                "tags": [{"name": "etl"}, {"name": "daily"}],
                "fileloc": "/opt/airflow/dags/etl.py"
            }"#,
        )
        .unwrap();
        assert_eq!(dag.dag_id, "etl_pipeline");
        assert!(dag.is_paused);
        assert!(dag.description.is_none());
        assert_eq!(dag.tags.len(), 2);
    }

    #[test]
    fn task_instance_tolerates_null_state() {
        let task: TaskInstance = serde_json::from_str(
            r#"{"task_id": "extract", "state": null, "try_number": 2}"#,
        )
        .unwrap();
        assert!(task.state.is_none());
        assert_eq!(task.try_number, 2);
    }
}
