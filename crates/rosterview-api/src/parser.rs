//! Week payload to [`Event`] conversion.
//!
//! The by-range endpoint answers with
//!
//! ```text
//! {"events": [{"name", "date", "start_time", "end_time", "session",
//!              "location": {"name"},
//!              "staff": [{"display_name", "designation": {"name"}}]}]}
//! ```
//!
//! Parsing is strict: a missing field or a malformed timestamp anywhere in
//! the payload rejects the whole week rather than dropping single events.

use chrono::NaiveDateTime;
use rosterview_core::{EVENT_TIME_FORMAT, Event, StaffAssignment};
use serde::Deserialize;

use crate::error::ParseError;

/// Parses one week's response body into events.
pub fn parse_payload(body: &str) -> Result<Vec<Event>, ParseError> {
    let payload: ApiPayload =
        serde_json::from_str(body).map_err(|e| ParseError::InvalidPayload(e.to_string()))?;

    let events = required(payload.events, "events")?;

    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| convert_event(event, &format!("events[{}]", i)))
        .collect()
}

fn convert_event(event: ApiEvent, path: &str) -> Result<Event, ParseError> {
    let field = |name: &str| format!("{}.{}", path, name);

    let name = required(event.name, &field("name"))?;
    let date = required(event.date, &field("date"))?;
    let start_time = parse_time(event.start_time, &field("start_time"))?;
    let end_time = parse_time(event.end_time, &field("end_time"))?;
    let session = required(event.session, &field("session"))?;
    let location = required(event.location, &field("location"))?;
    let location = required(location.name, &field("location.name"))?;

    let staff = required(event.staff, &field("staff"))?
        .into_iter()
        .enumerate()
        .map(|(i, person)| convert_staff(person, &format!("{}.staff[{}]", path, i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Event {
        name,
        date,
        start_time,
        end_time,
        session,
        location,
        staff,
    })
}

fn convert_staff(person: ApiStaff, path: &str) -> Result<StaffAssignment, ParseError> {
    let name = required(person.display_name, &format!("{}.display_name", path))?;
    let designation = required(person.designation, &format!("{}.designation", path))?;
    let designation = required(designation.name, &format!("{}.designation.name", path))?;

    Ok(StaffAssignment { name, designation })
}

fn parse_time(value: Option<String>, field: &str) -> Result<NaiveDateTime, ParseError> {
    let value = required(value, field)?;
    NaiveDateTime::parse_from_str(&value, EVENT_TIME_FORMAT).map_err(|_| {
        ParseError::BadDateFormat {
            field: field.to_string(),
            value,
        }
    })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ParseError> {
    value.ok_or_else(|| ParseError::MissingField {
        field: field.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ApiPayload {
    events: Option<Vec<ApiEvent>>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    name: Option<String>,
    date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    session: Option<String>,
    location: Option<ApiNamed>,
    staff: Option<Vec<ApiStaff>>,
}

#[derive(Debug, Deserialize)]
struct ApiStaff {
    display_name: Option<String>,
    designation: Option<ApiNamed>,
}

/// A nested `{"name": ...}` object (locations, designations).
#[derive(Debug, Deserialize)]
struct ApiNamed {
    name: Option<String>,
}
