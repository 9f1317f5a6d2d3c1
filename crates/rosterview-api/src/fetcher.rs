//! Week-by-week calendar fetching.
//!
//! [`CalendarFetcher`] issues one authenticated GET per [`WeekRange`]. Every
//! authenticated request goes through [`CalendarFetcher::send_authenticated`],
//! which applies the [`RetryPolicy`]: on a 401 the session is refreshed and
//! the identical request is sent again, at most `max_auth_retries` times.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{RequestBuilder, Response, StatusCode};
use rosterview_core::WeekRange;
use tracing::{debug, error, info, warn};

use crate::error::{AuthError, FetchError};
use crate::pacer::{CancelToken, RequestPacer, TokioPacer};
use crate::session::SessionManager;

/// Path of the events-by-range endpoint, relative to the API root.
pub const EVENTS_BY_RANGE_PATH: &str = "/roster/events/by-range";

/// Bounded retry applied to every authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// How many times a 401 may trigger refresh-and-resend.
    pub max_auth_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_auth_retries: 1,
        }
    }
}

/// The unparsed response body for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCalendarPayload {
    /// The week this payload covers.
    pub week: WeekRange,
    /// Response body as received.
    pub body: String,
}

/// Result of paginating over several weeks.
///
/// Pagination stops at the first error; `payloads` holds every week fetched
/// before it.
#[derive(Debug)]
pub struct PopulateOutcome {
    /// Successfully fetched weeks, in request order.
    pub payloads: Vec<RawCalendarPayload>,
    /// The error that stopped pagination, if any.
    pub error: Option<FetchError>,
}

impl PopulateOutcome {
    /// Returns true if every requested week was fetched.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetches calendar data one week at a time.
pub struct CalendarFetcher {
    session: Arc<SessionManager>,
    pacer: Arc<dyn RequestPacer>,
    request_delay: Duration,
    retry: RetryPolicy,
}

impl std::fmt::Debug for CalendarFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarFetcher")
            .field("request_delay", &self.request_delay)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl CalendarFetcher {
    /// Creates a fetcher using the session's configured request delay.
    pub fn new(session: Arc<SessionManager>) -> Self {
        let request_delay = session.config().request_delay;
        Self {
            session,
            pacer: Arc::new(TokioPacer),
            request_delay,
            retry: RetryPolicy::default(),
        }
    }

    /// Builder method to replace the pacer.
    pub fn with_pacer(mut self, pacer: Arc<dyn RequestPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Builder method to set the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The session used for requests.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Fetches one week of calendar data.
    pub async fn fetch_week(&self, week: WeekRange) -> Result<RawCalendarPayload, FetchError> {
        let url = self.session.config().endpoint(EVENTS_BY_RANGE_PATH);
        let query = [
            ("start_date", week.start_param()),
            ("end_date", week.end_param()),
            ("_", Utc::now().timestamp_millis().to_string()),
        ];

        let response = self
            .send_authenticated(|http| http.get(&url).query(&query))
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(error = %e, "failed to read error response body");
                String::new()
            });
            error!(status = status.as_u16(), %week, body = %body, "calendar request failed");
            return Err(FetchError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkError(format!("failed to read response: {}", e)))?;

        info!(%week, bytes = body.len(), "fetched calendar week");
        Ok(RawCalendarPayload { week, body })
    }

    /// Fetches `weeks` strictly in order, pausing between requests.
    ///
    /// Stops at the first failure or when `cancel` fires, returning the weeks
    /// fetched so far alongside the error.
    pub async fn populate(&self, weeks: &[WeekRange], cancel: &CancelToken) -> PopulateOutcome {
        let mut payloads = Vec::with_capacity(weeks.len());

        for (i, week) in weeks.iter().enumerate() {
            if i > 0 {
                self.pacer.pause(self.request_delay).await;
            }

            if cancel.is_cancelled() {
                warn!(fetched = payloads.len(), remaining = weeks.len() - i, "calendar fetch cancelled");
                return PopulateOutcome {
                    payloads,
                    error: Some(FetchError::Cancelled),
                };
            }

            match self.fetch_week(*week).await {
                Ok(payload) => payloads.push(payload),
                Err(e) => {
                    warn!(%week, fetched = payloads.len(), error = %e, "stopping pagination");
                    return PopulateOutcome {
                        payloads,
                        error: Some(e),
                    };
                }
            }
        }

        PopulateOutcome {
            payloads,
            error: None,
        }
    }

    /// Sends an authenticated request, refreshing on 401 per the retry policy.
    ///
    /// `build` must produce the same request every time it is called. The
    /// final response is returned whatever its status.
    pub async fn send_authenticated<F>(&self, build: F) -> Result<Response, FetchError>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let mut retries_left = self.retry.max_auth_retries;

        loop {
            let tokens = self
                .session
                .tokens()
                .await
                .ok_or(FetchError::Auth(AuthError::NotAuthenticated))?;

            let request = SessionManager::authorize(build(self.session.http()), &tokens);
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::NetworkError("request timeout".to_string())
                } else {
                    FetchError::NetworkError(format!("request failed: {}", e))
                }
            })?;
            debug!(url = %response.url(), status = response.status().as_u16(), "authenticated request");

            if response.status() != StatusCode::UNAUTHORIZED || retries_left == 0 {
                return Ok(response);
            }

            retries_left -= 1;
            warn!(retries_left, "access token rejected, refreshing");
            self.session.refresh_after(&tokens).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use mockito::{Matcher, Mock, Server};

    use crate::config::ApiConfig;
    use crate::pacer::BoxFuture;
    use crate::tokens::Credentials;

    #[derive(Default)]
    struct RecordingPacer {
        pauses: Mutex<Vec<Duration>>,
    }

    impl RecordingPacer {
        fn pauses(&self) -> Vec<Duration> {
            self.pauses.lock().unwrap().clone()
        }
    }

    impl RequestPacer for RecordingPacer {
        fn pause(&self, delay: Duration) -> BoxFuture<'_, ()> {
            self.pauses.lock().unwrap().push(delay);
            Box::pin(async {})
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week(start: NaiveDate) -> WeekRange {
        WeekRange::new(start, start + chrono::Duration::days(6))
    }

    async fn logged_in_fetcher(server: &mut Server) -> (CalendarFetcher, Arc<RecordingPacer>) {
        let config = ApiConfig::new(server.url()).unwrap();
        fetcher_with_config(server, config).await
    }

    async fn fetcher_with_config(
        server: &mut Server,
        config: ApiConfig,
    ) -> (CalendarFetcher, Arc<RecordingPacer>) {
        server
            .mock("POST", "/api/v1/login")
            .with_status(200)
            .with_body(r#"{"access_token":"access-1","refresh_token":"refresh-1"}"#)
            .create_async()
            .await;

        let session = Arc::new(SessionManager::new(&config).unwrap());
        session
            .login(&Credentials::new("dr@example.com", "hunter2"))
            .await
            .unwrap();

        let pacer = Arc::new(RecordingPacer::default());
        let fetcher = CalendarFetcher::new(session).with_pacer(pacer.clone());
        (fetcher, pacer)
    }

    async fn events_mock(server: &mut Server, token: &str, status: usize, body: &str) -> Mock {
        server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::Any)
            .match_header("authorization", format!("Bearer {}", token).as_str())
            .with_status(status)
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn fetch_week_sends_auth_and_range() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        let mock = server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2024-01-08".into()),
                Matcher::UrlEncoded("end_date".into(), "2024-01-14".into()),
                Matcher::Regex(r"_=\d{13}".into()),
            ]))
            .match_header("authorization", "Bearer access-1")
            .match_header(
                "cookie",
                "roster_access_token=access-1; roster_refresh_token=refresh-1",
            )
            .match_header("sec-fetch-mode", "cors")
            .with_status(200)
            .with_body(r#"{"events":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let payload = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap();
        assert_eq!(payload.body, r#"{"events":[]}"#);
        assert_eq!(payload.week, week(date(2024, 1, 8)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn single_401_refreshes_once_and_succeeds() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        let stale = events_mock(&mut server, "access-1", 401, "expired").await;
        let fresh = events_mock(&mut server, "access-2", 200, r#"{"events":[]}"#).await;
        let refresh = server
            .mock("POST", "/api/v1/refresh")
            .with_status(200)
            .with_body(r#"{"access_token":"access-2","refresh_token":"refresh-2"}"#)
            .expect(1)
            .create_async()
            .await;

        let payload = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap();
        assert_eq!(payload.body, r#"{"events":[]}"#);

        refresh.assert_async().await;
        stale.assert_async().await;
        fresh.assert_async().await;
    }

    #[tokio::test]
    async fn second_401_is_terminal_without_third_attempt() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        let events = server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::Any)
            .with_status(401)
            .expect(2)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/api/v1/refresh")
            .with_status(200)
            .with_body(r#"{"access_token":"access-2","refresh_token":"refresh-2"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        events.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_auth_error() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        events_mock(&mut server, "access-1", 401, "expired").await;
        server
            .mock("POST", "/api/v1/refresh")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Auth(AuthError::RefreshFailed { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        let events = server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let err = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        events.assert_async().await;
    }

    #[tokio::test]
    async fn zero_retry_policy_returns_first_401() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;
        let fetcher = fetcher.with_retry_policy(RetryPolicy {
            max_auth_retries: 0,
        });

        let refresh = server
            .mock("POST", "/api/v1/refresh")
            .expect(0)
            .create_async()
            .await;
        events_mock(&mut server, "access-1", 401, "").await;

        let err = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn unauthenticated_fetch_fails_fast() {
        let server = Server::new_async().await;
        let config = ApiConfig::new(server.url()).unwrap();
        let session = Arc::new(SessionManager::new(&config).unwrap());
        let fetcher = CalendarFetcher::new(session);

        let err = fetcher.fetch_week(week(date(2024, 1, 8))).await.unwrap_err();
        assert!(matches!(err, FetchError::Auth(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn populate_fetches_all_weeks_with_pauses_between() {
        let mut server = Server::new_async().await;
        let (fetcher, pacer) = logged_in_fetcher(&mut server).await;

        let events = server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"events":[]}"#)
            .expect(3)
            .create_async()
            .await;

        let weeks = [
            week(date(2024, 1, 1)),
            week(date(2024, 1, 8)),
            week(date(2024, 1, 15)),
        ];
        let outcome = fetcher.populate(&weeks, &CancelToken::never()).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.payloads.len(), 3);
        assert_eq!(outcome.payloads[2].week, weeks[2]);
        assert_eq!(pacer.pauses(), vec![Duration::from_secs(1); 2]);
        events.assert_async().await;
    }

    #[tokio::test]
    async fn populate_pauses_for_configured_delay() {
        let mut server = Server::new_async().await;
        let config = ApiConfig::new(server.url())
            .unwrap()
            .with_request_delay(Duration::from_millis(250));
        let (fetcher, pacer) = fetcher_with_config(&mut server, config).await;

        server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"events":[]}"#)
            .create_async()
            .await;

        let weeks = [week(date(2024, 1, 1)), week(date(2024, 1, 8))];
        let outcome = fetcher.populate(&weeks, &CancelToken::never()).await;

        assert!(outcome.is_complete());
        assert_eq!(pacer.pauses(), vec![Duration::from_millis(250)]);
    }

    #[tokio::test]
    async fn populate_keeps_weeks_before_failure() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::UrlEncoded("start_date".into(), "2024-01-01".into()))
            .with_status(200)
            .with_body(r#"{"events":[]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::UrlEncoded("start_date".into(), "2024-01-08".into()))
            .with_status(500)
            .create_async()
            .await;
        let third = server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::UrlEncoded("start_date".into(), "2024-01-15".into()))
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let weeks = [
            week(date(2024, 1, 1)),
            week(date(2024, 1, 8)),
            week(date(2024, 1, 15)),
        ];
        let outcome = fetcher.populate(&weeks, &CancelToken::never()).await;

        assert_eq!(outcome.payloads.len(), 1);
        assert_eq!(outcome.error.as_ref().and_then(FetchError::status), Some(500));
        third.assert_async().await;
    }

    #[tokio::test]
    async fn populate_stops_when_cancelled() {
        let mut server = Server::new_async().await;
        let (fetcher, _) = logged_in_fetcher(&mut server).await;

        let events = server
            .mock("GET", "/api/v1/roster/events/by-range")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let (handle, token) = CancelToken::new();
        handle.cancel();

        let outcome = fetcher
            .populate(&[week(date(2024, 1, 1)), week(date(2024, 1, 8))], &token)
            .await;

        assert!(outcome.payloads.is_empty());
        assert!(matches!(outcome.error, Some(FetchError::Cancelled)));
        events.assert_async().await;
    }
}
