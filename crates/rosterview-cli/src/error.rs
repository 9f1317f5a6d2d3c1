//! CLI error types.

use rosterview_api::ClientError;
use rosterview_core::{ConfigError, TracingError};
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file, credentials or date range.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Login, fetch or parse failure from the roster client.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Logging could not be initialised.
    #[error("failed to initialise logging: {0}")]
    Tracing(#[from] TracingError),

    /// Report or config could not be serialized.
    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn config_errors_are_prefixed() {
        let err: CliError = ConfigError::MissingCredentials("email".to_string()).into();
        assert_eq!(
            err.to_string(),
            "configuration error: missing credentials: email"
        );
    }

    #[test]
    fn client_errors_are_transparent() {
        let err: CliError = ClientError::NotLoggedIn.into();
        assert_eq!(err.to_string(), "must be logged in");

        let range = ConfigError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let err: CliError = ClientError::from(range).into();
        assert_eq!(err.to_string(), "start 2024-02-01 must be before end 2024-01-01");
    }
}
