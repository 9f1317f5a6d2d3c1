//! Login credentials and the access/refresh token pair.

use std::fmt;

use serde::Deserialize;

use crate::error::AuthError;

/// Login email and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a new credential set.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The form body posted to the login endpoint.
    pub(crate) fn form(&self) -> [(&'static str, &str); 2] {
        [
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access and refresh tokens issued by the login or refresh endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer token for API requests.
    pub access_token: String,
    /// Token exchanged for a new pair when the access token expires.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Value of the `Cookie` header, mirroring both tokens.
    pub fn cookie(&self) -> String {
        format!(
            "roster_access_token={}; roster_refresh_token={}",
            self.access_token, self.refresh_token
        )
    }

    /// The form body posted to the refresh endpoint.
    pub(crate) fn form(&self) -> [(&'static str, &str); 2] {
        [
            ("access_token", self.access_token.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
        ]
    }

    /// Parses a login/refresh response body.
    ///
    /// Both tokens must be present and non-empty.
    pub fn from_response(body: &str) -> Result<Self, AuthError> {
        let response: TokenResponse = serde_json::from_str(body)
            .map_err(|e| AuthError::MalformedResponse(format!("invalid token response: {}", e)))?;

        let access_token = require_token(response.access_token, "access_token")?;
        let refresh_token = require_token(response.refresh_token, "refresh_token")?;
        Ok(Self {
            access_token,
            refresh_token,
        })
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Response from the login and refresh endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

fn require_token(token: Option<String>, field: &str) -> Result<String, AuthError> {
    token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::MalformedResponse(format!("missing field `{}`", field)))
}
