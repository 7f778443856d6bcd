//! Connection configuration for the Airflow REST API.
//!
//! The configuration is built once at process entry, either from the
//! environment ([`AirflowConfig::from_env`]) or directly via
//! [`AirflowConfig::with_token`] / [`AirflowConfig::with_basic_auth`], and
//! then handed to [`crate::AirflowClient`]. It is never mutated afterwards.

use std::env;

use base64::prelude::*;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the Airflow base URL.
pub const ENV_BASE_URL: &str = "AIRFLOW_BASE_URL";
/// Environment variable holding a bearer token.
pub const ENV_TOKEN: &str = "AIRFLOW_TOKEN";
/// Environment variable holding the basic-auth username.
pub const ENV_USERNAME: &str = "AIRFLOW_USERNAME";
/// Environment variable holding the basic-auth password.
pub const ENV_PASSWORD: &str = "AIRFLOW_PASSWORD";

/// Base URL used when `AIRFLOW_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Credential mode for the Airflow API.
///
/// Exactly one mode exists per configuration; a config with neither a token
/// nor a complete username/password pair cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Bearer token authentication.
    Token(String),
    /// HTTP basic authentication.
    Basic { username: String, password: String },
}

impl Credentials {
    /// Render the value of the `Authorization` header for this mode.
    pub fn authorization_header(&self) -> String {
        match self {
            Credentials::Token(token) => format!("Bearer {token}"),
            Credentials::Basic { username, password } => {
                let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
        }
    }
}

/// Immutable connection configuration: base URL plus one credential mode.
#[derive(Debug, Clone)]
pub struct AirflowConfig {
    pub base_url: Url,
    pub credentials: Credentials,
}

impl AirflowConfig {
    /// Build a configuration from the process environment.
    ///
    /// `AIRFLOW_BASE_URL` falls back to [`DEFAULT_BASE_URL`]. A token takes
    /// precedence over a username/password pair when both are set. Missing
    /// credentials are a fatal configuration error: the process must not
    /// start serving without a usable mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let token = env::var(ENV_TOKEN).ok().filter(|value| !value.is_empty());
        let username = env::var(ENV_USERNAME).ok().filter(|value| !value.is_empty());
        let password = env::var(ENV_PASSWORD).ok().filter(|value| !value.is_empty());

        let credentials = match (token, username, password) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(username), Some(password)) => Credentials::Basic { username, password },
            _ => return Err(ConfigError::MissingCredentials),
        };

        Self::new(&base_url, credentials)
    }

    /// Build a configuration from explicit parts.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            source,
        })?;
        Ok(Self { base_url, credentials })
    }

    /// Token-mode configuration, for injection into tests and embedders.
    pub fn with_token(base_url: &str, token: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(base_url, Credentials::Token(token.into()))
    }

    /// Basic-mode configuration, for injection into tests and embedders.
    pub fn with_basic_auth(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            base_url,
            Credentials::Basic {
                username: username.into(),
                password: password.into(),
            },
        )
    }

    /// Root of the versioned REST API, without a trailing slash.
    pub fn api_root(&self) -> String {
        format!("{}/api/v1", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 4] = [ENV_BASE_URL, ENV_TOKEN, ENV_USERNAME, ENV_PASSWORD];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], test: F) {
        let assignments: Vec<(String, Option<String>)> = ALL_VARS
            .iter()
            .map(|name| {
                let value = vars
                    .iter()
                    .find(|(var, _)| var == name)
                    .map(|(_, value)| value.to_string());
                (name.to_string(), value)
            })
            .collect();
        temp_env::with_vars(assignments, test);
    }

    #[test]
    fn missing_credentials_is_fatal() {
        with_env(&[], || {
            assert!(matches!(AirflowConfig::from_env(), Err(ConfigError::MissingCredentials)));
        });
    }

    #[test]
    fn username_without_password_is_incomplete() {
        with_env(&[(ENV_USERNAME, "admin")], || {
            assert!(matches!(AirflowConfig::from_env(), Err(ConfigError::MissingCredentials)));
        });
        with_env(&[(ENV_PASSWORD, "secret")], || {
            assert!(matches!(AirflowConfig::from_env(), Err(ConfigError::MissingCredentials)));
        });
    }

    #[test]
    fn token_mode_from_env() {
        with_env(&[(ENV_TOKEN, "t0ken")], || {
            let config = AirflowConfig::from_env().unwrap();
            assert_eq!(config.credentials, Credentials::Token("t0ken".into()));
            assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        });
    }

    #[test]
    fn basic_mode_from_env() {
        with_env(&[(ENV_USERNAME, "admin"), (ENV_PASSWORD, "secret")], || {
            let config = AirflowConfig::from_env().unwrap();
            assert_eq!(
                config.credentials,
                Credentials::Basic {
                    username: "admin".into(),
                    password: "secret".into(),
                }
            );
        });
    }

    #[test]
    fn token_takes_precedence_over_basic_pair() {
        with_env(
            &[(ENV_TOKEN, "t0ken"), (ENV_USERNAME, "admin"), (ENV_PASSWORD, "secret")],
            || {
                let config = AirflowConfig::from_env().unwrap();
                assert!(matches!(config.credentials, Credentials::Token(_)));
            },
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        with_env(&[(ENV_BASE_URL, "not a url"), (ENV_TOKEN, "t")], || {
            assert!(matches!(
                AirflowConfig::from_env(),
                Err(ConfigError::InvalidBaseUrl { .. })
            ));
        });
    }

    #[test]
    fn bearer_header_value() {
        let credentials = Credentials::Token("abc123".into());
        assert_eq!(credentials.authorization_header(), "Bearer abc123");
    }

    #[test]
    fn basic_header_value_is_base64_of_username_colon_password() {
        let credentials = Credentials::Basic {
            username: "admin".into(),
            password: "secret".into(),
        };
        // base64("admin:secret")
        assert_eq!(credentials.authorization_header(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn api_root_strips_trailing_slash() {
        let config = AirflowConfig::with_token("http://airflow.example.com:8080/", "t").unwrap();
        assert_eq!(config.api_root(), "http://airflow.example.com:8080/api/v1");
    }
}
