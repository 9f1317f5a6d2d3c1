//! Roster API client.
//!
//! This crate talks to the upstream roster service:
//!
//! - [`SessionManager`] - Login, token refresh and request decoration
//! - [`CalendarFetcher`] - One authenticated GET per week, bounded 401 retry
//! - [`parse_payload`] - Strict week payload to [`Event`](rosterview_core::Event) conversion
//! - [`RosterClient`] - Facade that fetches a date range and aggregates it
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   login / refresh   ┌─────────────────┐
//! │ SessionManager  │ ◄─────────────────► │  /api/v1 login  │
//! └────────┬────────┘                     └─────────────────┘
//!          │ bearer + cookie
//!          ▼
//! ┌─────────────────┐   one GET per week  ┌─────────────────┐
//! │ CalendarFetcher │ ◄─────────────────► │ events/by-range │
//! └────────┬────────┘                     └─────────────────┘
//!          │ RawCalendarPayload
//!          ▼ parse_payload()
//!   ┌─────────────┐
//!   │   Event     │
//!   └──────┬──────┘
//!          ▼ aggregate_by_registrar() / aggregate_by_event()
//!   ┌─────────────┐
//!   │ Aggregates  │
//!   └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rosterview_api::{ApiConfig, Credentials, RosterClient};
//!
//! async fn registrars() -> Result<(), rosterview_api::ClientError> {
//!     let credentials = Credentials::new("dr@example.com", "secret");
//!     let mut client = RosterClient::new(ApiConfig::default(), credentials, None)?;
//!     client.login().await?;
//!     let counts = client.assemble_registrar_events().await?;
//!     println!("{counts:?}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod headers;
pub mod pacer;
pub mod parser;
pub mod session;
pub mod tokens;

// Re-export main types at crate root
pub use client::{ClientState, RosterClient};
pub use config::ApiConfig;
pub use error::{AuthError, ClientError, ClientResult, FetchError, ParseError};
pub use fetcher::{CalendarFetcher, PopulateOutcome, RawCalendarPayload, RetryPolicy};
pub use pacer::{BoxFuture, CancelHandle, CancelToken, RequestPacer, TokioPacer};
pub use parser::parse_payload;
pub use session::SessionManager;
pub use tokens::{Credentials, TokenPair};
