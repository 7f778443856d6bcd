//! Model Context Protocol (MCP) tool surface for Apache Airflow.
//!
//! This crate turns the Airflow REST API into a catalog of MCP tools: one
//! tool per endpoint, with arguments validated against declared schemas and
//! JSON responses rendered into human-readable text. It provides the shared
//! tool router ([`AirflowMcpServer`]), a streamable-HTTP host
//! ([`AirflowHttpServer`]), and a reduced JSON-RPC shim for serverless
//! deployments ([`server::faas`]).

pub mod render;
pub mod server;

pub use server::{AirflowHttpServer, AirflowMcpServer, RunningHttpServer, faas};
