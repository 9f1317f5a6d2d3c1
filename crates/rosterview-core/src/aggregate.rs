//! Count aggregation over roster events.
//!
//! Two views are supported:
//!
//! - [`aggregate_by_registrar`]: staff name → event name → count
//! - [`aggregate_by_event`]: event name → staff name → count
//!
//! Both are pure folds. Only assignments accepted by the [`FilterConfig`]
//! are counted, and the outer map iterates in ascending key order.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::event::{Event, StaffAssignment};

/// Designation counted by default.
pub const DEFAULT_DESIGNATION: &str = "registrar";

/// Placeholder name the roster uses for unfilled slots.
pub const UNASSIGNED_NAME: &str = "---unassigned---";

/// Staff name → event name → count.
pub type AggregateByRegistrar = BTreeMap<String, BTreeMap<String, u32>>;

/// Event name → staff name → count.
pub type AggregateByEvent = BTreeMap<String, BTreeMap<String, u32>>;

/// Which staff assignments are counted.
///
/// Comparisons are case-insensitive; entries are stored lower-cased, also
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FilterFields")]
pub struct FilterConfig {
    designations_to_include: HashSet<String>,
    names_to_exclude: HashSet<String>,
}

/// Serialized shape of [`FilterConfig`], normalized through
/// [`FilterConfig::new`].
#[derive(Deserialize)]
struct FilterFields {
    designations_to_include: Vec<String>,
    names_to_exclude: Vec<String>,
}

impl From<FilterFields> for FilterConfig {
    fn from(fields: FilterFields) -> Self {
        Self::new(fields.designations_to_include, fields.names_to_exclude)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new([DEFAULT_DESIGNATION], [UNASSIGNED_NAME])
    }
}

impl FilterConfig {
    /// Creates a filter from designations to include and names to exclude.
    pub fn new<D, N>(designations: D, exclude_names: N) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            designations_to_include: designations
                .into_iter()
                .map(|d| d.as_ref().to_lowercase())
                .collect(),
            names_to_exclude: exclude_names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the assignment should be counted.
    pub fn accepts(&self, staff: &StaffAssignment) -> bool {
        self.designations_to_include
            .contains(&staff.designation.to_lowercase())
            && !self.names_to_exclude.contains(&staff.name.to_lowercase())
    }

    /// The lower-cased designations that are counted.
    pub fn designations(&self) -> &HashSet<String> {
        &self.designations_to_include
    }

    /// The lower-cased names that are never counted.
    pub fn excluded_names(&self) -> &HashSet<String> {
        &self.names_to_exclude
    }
}

/// Counts, per staff member, how many times they were rostered on each event.
pub fn aggregate_by_registrar(events: &[Event], filter: &FilterConfig) -> AggregateByRegistrar {
    fold(events, filter, |event, staff| (&staff.name, &event.name))
}

/// Counts, per event, how many times each staff member was rostered on it.
pub fn aggregate_by_event(events: &[Event], filter: &FilterConfig) -> AggregateByEvent {
    fold(events, filter, |event, staff| (&event.name, &staff.name))
}

/// Total of all counts in an aggregate.
pub fn total_count(aggregate: &BTreeMap<String, BTreeMap<String, u32>>) -> u64 {
    aggregate
        .values()
        .flat_map(|inner| inner.values())
        .map(|&n| u64::from(n))
        .sum()
}

fn fold<'a, F>(events: &'a [Event], filter: &FilterConfig, keys: F) -> BTreeMap<String, BTreeMap<String, u32>>
where
    F: Fn(&'a Event, &'a StaffAssignment) -> (&'a String, &'a String),
{
    let mut result: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

    for event in events {
        for staff in event.staff.iter().filter(|s| filter.accepts(s)) {
            let (outer, inner) = keys(event, staff);
            *result
                .entry(outer.clone())
                .or_default()
                .entry(inner.clone())
                .or_insert(0) += 1;
        }
    }

    result
}
