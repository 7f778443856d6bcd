//! Apache Airflow REST API client utilities.
//!
//! This crate provides a lightweight client for the Airflow stable REST API
//! (`/api/v1`). It focuses on:
//!
//! - Building an HTTP client with sensible defaults
//! - Selecting a credential mode (bearer token or basic auth) from the
//!   environment or from an explicitly constructed configuration
//! - One thin, auditable method per remote endpoint
//! - Normalizing non-2xx responses into a typed upstream error
//!
//! The primary entry points are [`AirflowConfig`] and [`AirflowClient`].
//!
//! # Example
//!
//! ```ignore
//! use airflow_api::{AirflowClient, AirflowConfig, PageParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AirflowConfig::from_env()?;
//!     let client = AirflowClient::new(config)?;
//!     let dags = client.list_dags(&PageParams::default()).await?;
//!     println!("{} DAGs", dags.total_entries);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::AirflowClient;
pub use config::{AirflowConfig, Credentials, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_PASSWORD, ENV_TOKEN, ENV_USERNAME};
pub use error::{ClientError, ConfigError};
pub use types::{
    Dag, DagCollection, DagRun, DagRunCollection, DagTag, PageParams, TaskInstance, TaskInstanceCollection, TaskLogs,
};
