//! High-level roster client.
//!
//! [`RosterClient`] ties the session, the week fetcher and the aggregator
//! together for one date range. It is owned by a single task; every method
//! that touches the network takes `&mut self`.

use std::sync::Arc;

use chrono::NaiveDate;
use rosterview_core::{
    AggregateByEvent, AggregateByRegistrar, DateRange, Event, aggregate_by_event,
    aggregate_by_registrar, generate_weeks,
};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::fetcher::{CalendarFetcher, RawCalendarPayload};
use crate::pacer::{CancelToken, RequestPacer};
use crate::parser::parse_payload;
use crate::session::SessionManager;
use crate::tokens::Credentials;

/// Lifecycle of a [`RosterClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Created, no successful login yet.
    Unauthenticated,
    /// Logged in; requests carry the token pair.
    Authenticated,
    /// Closed; every further operation fails.
    Closed,
}

/// Fetches and aggregates roster data for a date range.
#[derive(Debug)]
pub struct RosterClient {
    config: ApiConfig,
    credentials: Credentials,
    range: DateRange,
    state: ClientState,
    fetcher: Option<CalendarFetcher>,
    cancel: CancelToken,
    payloads: Vec<RawCalendarPayload>,
    populated: bool,
}

impl RosterClient {
    /// Creates a client for `requested`, resolved against today's date.
    pub fn new(
        config: ApiConfig,
        credentials: Credentials,
        requested: Option<(Option<NaiveDate>, Option<NaiveDate>)>,
    ) -> ClientResult<Self> {
        let (start, end) = requested.unwrap_or_default();
        let range = DateRange::resolve(start, end);
        let session = Arc::new(SessionManager::new(&config)?);

        debug!(%range, "created roster client");
        Ok(Self {
            fetcher: Some(CalendarFetcher::new(session)),
            config,
            credentials,
            range,
            state: ClientState::Unauthenticated,
            cancel: CancelToken::never(),
            payloads: Vec::new(),
            populated: false,
        })
    }

    /// Builder method to replace the pacer used between week requests.
    pub fn with_pacer(mut self, pacer: Arc<dyn RequestPacer>) -> Self {
        self.fetcher = self.fetcher.map(|f| f.with_pacer(pacer));
        self
    }

    /// Builder method to stop pagination once `cancel` fires.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// The date range being reported on.
    pub fn date_range(&self) -> DateRange {
        self.range
    }

    /// Weeks fetched so far, in request order.
    pub fn cached_weeks(&self) -> ClientResult<&[RawCalendarPayload]> {
        self.fetcher()?;
        Ok(&self.payloads)
    }

    /// Logs in with the client's credentials.
    pub async fn login(&mut self) -> ClientResult<()> {
        let fetcher = self.fetcher()?;
        fetcher.session().login(&self.credentials).await?;
        self.state = ClientState::Authenticated;
        Ok(())
    }

    /// Replaces the date range. Requires `start < end`.
    ///
    /// On error the current range is kept. A changed range discards any
    /// cached calendar data.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> ClientResult<()> {
        self.fetcher()?;
        let range = DateRange::new(start, end)?;

        if range != self.range {
            info!(%range, "date range changed");
            self.range = range;
            self.payloads.clear();
            self.populated = false;
        }
        Ok(())
    }

    /// Fetches every week of the range that is not cached yet.
    ///
    /// Weeks fetched before a failure stay cached and a later call resumes
    /// after them. Once the whole range is cached this is a no-op.
    pub async fn populate_calendar_data(&mut self) -> ClientResult<()> {
        self.ensure_authenticated()?;
        if self.populated {
            return Ok(());
        }

        let weeks = generate_weeks(&self.range);
        let pending = &weeks[self.payloads.len().min(weeks.len())..];
        info!(
            range = %self.range,
            days = self.range.num_days(),
            weeks = pending.len(),
            "fetching calendar data"
        );

        let fetcher = self.fetcher()?;
        let outcome = fetcher.populate(pending, &self.cancel).await;
        self.payloads.extend(outcome.payloads);

        match outcome.error {
            Some(e) => {
                warn!(
                    cached = self.payloads.len(),
                    total = weeks.len(),
                    "calendar data incomplete"
                );
                Err(e.into())
            }
            None => {
                self.populated = true;
                Ok(())
            }
        }
    }

    /// Parses every cached week into events.
    ///
    /// Fails unless the whole range has been fetched.
    pub fn events(&self) -> ClientResult<Vec<Event>> {
        self.ensure_authenticated()?;
        if !self.populated {
            return Err(ClientError::CalendarIncomplete {
                fetched: self.payloads.len(),
                total: generate_weeks(&self.range).len(),
            });
        }

        let mut events = Vec::new();
        for payload in &self.payloads {
            let week_events = parse_payload(&payload.body).map_err(|source| ClientError::Parse {
                week: payload.week.to_string(),
                source,
            })?;
            events.extend(week_events);
        }
        Ok(events)
    }

    /// Counts assignments per registrar, then per event name.
    pub async fn assemble_registrar_events(&mut self) -> ClientResult<AggregateByRegistrar> {
        let events = self.load_events().await?;
        Ok(aggregate_by_registrar(&events, &self.config.filter))
    }

    /// Counts assignments per event name, then per registrar.
    pub async fn assemble_events_with_registrar_counts(
        &mut self,
    ) -> ClientResult<AggregateByEvent> {
        let events = self.load_events().await?;
        Ok(aggregate_by_event(&events, &self.config.filter))
    }

    /// Closes the client, forgets its tokens and drops the HTTP session.
    pub async fn close(&mut self) {
        if let Some(fetcher) = self.fetcher.take() {
            info!("closing roster client");
            fetcher.session().clear().await;
        }
        self.state = ClientState::Closed;
        self.payloads.clear();
        self.populated = false;
    }

    async fn load_events(&mut self) -> ClientResult<Vec<Event>> {
        self.populate_calendar_data().await?;
        let events = self.events()?;
        debug!(events = events.len(), "parsed calendar events");
        Ok(events)
    }

    fn ensure_authenticated(&self) -> ClientResult<()> {
        match self.state {
            ClientState::Authenticated => Ok(()),
            ClientState::Unauthenticated => Err(ClientError::NotLoggedIn),
            ClientState::Closed => Err(ClientError::Closed),
        }
    }

    fn fetcher(&self) -> ClientResult<&CalendarFetcher> {
        self.fetcher.as_ref().ok_or(ClientError::Closed)
    }
}
