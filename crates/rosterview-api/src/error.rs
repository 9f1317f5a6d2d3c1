//! Error types for roster API operations.
//!
//! Each stage of the pipeline has its own error enum so callers can tell a
//! rejected login from a failed week fetch from a malformed payload:
//!
//! - [`AuthError`] - login and token refresh
//! - [`FetchError`] - fetching one week of calendar data
//! - [`ParseError`] - normalizing a week's payload
//! - [`ClientError`] - anything surfaced by [`crate::RosterClient`]

use rosterview_core::ConfigError;
use thiserror::Error;

/// Login or token refresh failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login endpoint rejected the credentials.
    #[error("login failed with status {status}: {body}")]
    LoginFailed {
        /// HTTP status returned by the login endpoint.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The refresh endpoint rejected the token pair.
    #[error("token refresh failed with status {status}: {body}")]
    RefreshFailed {
        /// HTTP status returned by the refresh endpoint.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// A 200 response did not carry both tokens.
    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    /// A refresh was attempted before any login succeeded.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The request never produced a response.
    #[error("network error during authentication: {0}")]
    Network(String),
}

/// Fetching one week of calendar data failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-200 status (after any retry).
    #[error("calendar request failed with status {status}")]
    HttpError {
        /// Final HTTP status.
        status: u16,
    },

    /// The request never produced a response, or the body could not be read.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A 401 triggered a token refresh, and the refresh failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Pagination was stopped by a cancel token or deadline.
    #[error("calendar fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Returns the HTTP status for [`FetchError::HttpError`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status } => Some(*status),
            _ => None,
        }
    }
}

/// A week's payload does not match the expected schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A required field is absent or null.
    #[error("missing field `{field}`")]
    MissingField {
        /// Path of the missing field, e.g. `events[2].staff[0].display_name`.
        field: String,
    },

    /// A timestamp is not in `YYYY-MM-DD HH:MM:SS` form.
    #[error("field `{field}` has bad date format: {value:?}")]
    BadDateFormat {
        /// Path of the offending field.
        field: String,
        /// The value as received.
        value: String,
    },

    /// The payload is not JSON, or a field has the wrong type.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Errors surfaced by [`crate::RosterClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login or refresh failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A week could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A week's payload was malformed.
    #[error("week {week}: {source}")]
    Parse {
        /// The week whose payload failed, as `start..end`.
        week: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },

    /// Invalid configuration or date range.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP session could not be created.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// An aggregation was requested before logging in.
    #[error("must be logged in")]
    NotLoggedIn,

    /// Events were requested before every week of the range was fetched.
    #[error("calendar data incomplete: {fetched} of {total} weeks fetched")]
    CalendarIncomplete {
        /// Weeks cached so far.
        fetched: usize,
        /// Weeks in the date range.
        total: usize,
    },

    /// The client was closed.
    #[error("client is closed")]
    Closed,
}

/// A specialized Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        let err = AuthError::LoginFailed {
            status: 403,
            body: "bad password".to_string(),
        };
        assert_eq!(err.to_string(), "login failed with status 403: bad password");
    }

    #[test]
    fn fetch_error_status() {
        assert_eq!(FetchError::HttpError { status: 401 }.status(), Some(401));
        assert_eq!(FetchError::Cancelled.status(), None);
    }

    #[test]
    fn fetch_error_wraps_auth_transparently() {
        let err: FetchError = AuthError::NotAuthenticated.into();
        assert_eq!(err.to_string(), "not authenticated");
    }

    #[test]
    fn incomplete_calendar_display() {
        let err = ClientError::CalendarIncomplete {
            fetched: 1,
            total: 3,
        };
        assert_eq!(
            err.to_string(),
            "calendar data incomplete: 1 of 3 weeks fetched"
        );
    }

    #[test]
    fn client_parse_error_names_week() {
        let err = ClientError::Parse {
            week: "2024-01-08..2024-01-14".to_string(),
            source: ParseError::MissingField {
                field: "events[0].name".to_string(),
            },
        };
        let display = err.to_string();
        assert!(display.contains("2024-01-08..2024-01-14"));
        assert!(display.contains("events[0].name"));
    }
}
