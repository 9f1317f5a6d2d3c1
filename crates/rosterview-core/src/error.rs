//! Configuration errors shared across crates.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while resolving configuration or report parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The start date is not before the end date.
    #[error("start {start} must be before end {end}")]
    InvalidDateRange {
        /// The rejected start date.
        start: NaiveDate,
        /// The rejected end date.
        end: NaiveDate,
    },

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that failed to load.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A secret reference could not be resolved.
    #[error("failed to resolve secret: {0}")]
    Secret(String),

    /// No login email/password was configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// The API base URL is not a valid URL.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}
