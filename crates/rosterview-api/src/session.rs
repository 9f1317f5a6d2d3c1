//! Session and token lifecycle.
//!
//! [`SessionManager`] owns the HTTP session and the current [`TokenPair`].
//! It performs login and refresh against the upstream endpoints and
//! decorates outgoing requests with the bearer header and token cookie.
//!
//! Refreshes are serialized: concurrent callers that saw the same stale pair
//! wait for one refresh and reuse its result.

use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::{Client, RequestBuilder, StatusCode};
use rosterview_core::ConfigError;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::config::ApiConfig;
use crate::error::{AuthError, ClientError};
use crate::headers::browser_headers;
use crate::tokens::{Credentials, TokenPair};

/// Which token endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenEndpoint {
    Login,
    Refresh,
}

impl TokenEndpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Refresh => "/refresh",
        }
    }

    fn rejected(self, status: u16, body: String) -> AuthError {
        match self {
            Self::Login => AuthError::LoginFailed { status, body },
            Self::Refresh => AuthError::RefreshFailed { status, body },
        }
    }
}

/// Owns the HTTP session and the access/refresh token pair.
#[derive(Debug)]
pub struct SessionManager {
    http: Client,
    config: ApiConfig,
    tokens: RwLock<Option<TokenPair>>,
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates an unauthenticated session for the configured site.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let headers = browser_headers(&config.origin())
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.origin(), e)))?;

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            config: config.clone(),
            tokens: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// The underlying HTTP client (carries the browser header bundle).
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// The configuration this session was built from.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns a copy of the current token pair, if logged in.
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    /// Logs in with the given credentials and stores the issued token pair.
    ///
    /// On failure the previously stored pair (if any) is kept.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        let pair = self
            .request_tokens(TokenEndpoint::Login, &credentials.form())
            .await?;

        *self.tokens.write().await = Some(pair.clone());
        info!("login successful");
        Ok(pair)
    }

    /// Exchanges the stored token pair for a new one.
    pub async fn refresh(&self) -> Result<TokenPair, AuthError> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.tokens().await.ok_or(AuthError::NotAuthenticated)?;
        self.refresh_locked(&current).await
    }

    /// Refreshes unless another caller already replaced `stale`.
    ///
    /// Used after a 401: the caller passes the pair its request was sent
    /// with, so only the first of several concurrent 401s hits the refresh
    /// endpoint.
    pub(crate) async fn refresh_after(&self, stale: &TokenPair) -> Result<TokenPair, AuthError> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.tokens().await.ok_or(AuthError::NotAuthenticated)?;

        if current != *stale {
            debug!("token pair already refreshed by another request");
            return Ok(current);
        }

        self.refresh_locked(&current).await
    }

    async fn refresh_locked(&self, current: &TokenPair) -> Result<TokenPair, AuthError> {
        let pair = self
            .request_tokens(TokenEndpoint::Refresh, &current.form())
            .await?;

        *self.tokens.write().await = Some(pair.clone());
        info!("token refresh successful");
        Ok(pair)
    }

    /// Adds the bearer header and token cookie for `tokens` to a request.
    pub fn authorize(request: RequestBuilder, tokens: &TokenPair) -> RequestBuilder {
        request
            .header(AUTHORIZATION, tokens.bearer())
            .header(COOKIE, tokens.cookie())
    }

    /// Drops the stored tokens.
    pub async fn clear(&self) {
        *self.tokens.write().await = None;
    }

    async fn request_tokens(
        &self,
        endpoint: TokenEndpoint,
        form: &[(&str, &str)],
    ) -> Result<TokenPair, AuthError> {
        let url = self.config.endpoint(endpoint.path());

        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("{} request failed: {}", url, e)))?;

        let status = response.status();
        info!(status = status.as_u16(), "{:?} response", endpoint);

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Network(format!("failed to read response: {}", e)))?;

        if status != StatusCode::OK {
            error!(status = status.as_u16(), body = %body, "{:?} rejected", endpoint);
            return Err(endpoint.rejected(status.as_u16(), body));
        }

        TokenPair::from_response(&body).inspect_err(|e| {
            error!(error = %e, body = %body, "{:?} returned an unusable body", endpoint);
        })
    }
}
