//! Tool operation bodies.
//!
//! One async function per catalog entry, shared by the rmcp tool router and
//! the serverless JSON-RPC shim so the catalog is defined in exactly one
//! place. Each function calls one client operation (the log aggregates fan
//! out to several) and renders the result into the tool's text block.

mod dags;
mod logs;
mod runs;
mod tasks;

pub use dags::{get_dag, list_dags, set_dag_paused};
pub use logs::{get_dag_run_logs, get_task_logs, tail_dag_run};
pub use runs::{get_dag_run, list_dag_runs, trigger_dag};
pub use tasks::{get_task_instance, list_task_instances};
