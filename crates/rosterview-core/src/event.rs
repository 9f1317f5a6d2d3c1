//! Roster event types.
//!
//! An [`Event`] is one rostered session (a clinic, a theatre list, a ward
//! round) together with the staff assigned to it. Events are produced by the
//! API crate's payload parser and consumed by [`crate::aggregate`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used by the upstream API for `start_time` / `end_time`.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A staff member rostered onto an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffAssignment {
    /// Display name as shown on the roster.
    pub name: String,
    /// Role label for this assignment (e.g. "Registrar", "Consultant").
    pub designation: String,
}

impl StaffAssignment {
    /// Creates a new staff assignment.
    pub fn new(name: impl Into<String>, designation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            designation: designation.into(),
        }
    }
}

/// A normalized roster event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event name, used as the key of the by-event aggregate.
    pub name: String,
    /// The roster date, as reported upstream.
    pub date: String,
    /// When the event starts (local wall-clock time).
    pub start_time: NaiveDateTime,
    /// When the event ends (local wall-clock time).
    pub end_time: NaiveDateTime,
    /// Session label (e.g. "AM", "PM").
    pub session: String,
    /// Location name.
    pub location: String,
    /// Assigned staff, in upstream order.
    pub staff: Vec<StaffAssignment>,
}

impl Event {
    /// Creates an event with no staff.
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            start_time,
            end_time,
            session: String::new(),
            location: String::new(),
            staff: Vec::new(),
        }
    }

    /// Builder method to set the session label.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to add a staff assignment.
    pub fn with_staff(mut self, name: impl Into<String>, designation: impl Into<String>) -> Self {
        self.staff.push(StaffAssignment::new(name, designation));
        self
    }
}
