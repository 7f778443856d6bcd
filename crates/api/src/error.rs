//! Error types for the Airflow API client.

use reqwest::StatusCode;
use thiserror::Error;

/// Startup-time configuration failures. Fatal: the process does not begin
/// serving with an incomplete configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("either AIRFLOW_TOKEN or both AIRFLOW_USERNAME and AIRFLOW_PASSWORD must be provided")]
    MissingCredentials,

    #[error("invalid AIRFLOW_BASE_URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("credentials do not form a valid Authorization header: {0}")]
    InvalidAuthHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Request-time failures against the Airflow REST API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response from the engine. Carries the HTTP status and the
    /// upstream body text; callers do not retry automatically.
    #[error("Airflow API error: {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// Transport-level failure from the underlying HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Create an upstream error from a status code and body text.
    pub fn upstream(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_carries_status_and_body() {
        let err = ClientError::upstream(StatusCode::NOT_FOUND, "DAG not found");
        assert_eq!(err.to_string(), "Airflow API error: 404 Not Found: DAG not found");
    }
}
