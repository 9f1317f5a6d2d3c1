//! Report rendering for terminal and JSON output.

use std::collections::BTreeMap;
use std::fmt::Write;

use rosterview_core::{DateRange, total_count};
use serde::Serialize;

/// Which aggregate a report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Registrar, then event.
    Registrars,
    /// Event, then registrar.
    Events,
}

impl ReportKind {
    fn title(self) -> &'static str {
        match self {
            Self::Registrars => "Registrars",
            Self::Events => "Events",
        }
    }
}

/// A rendered-ready report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Which aggregate this is.
    pub kind: ReportKind,
    /// The range the counts cover.
    pub range: DateRange,
    /// Sum of all counts.
    pub total: u64,
    /// Outer key, inner key, count.
    pub counts: &'a BTreeMap<String, BTreeMap<String, u32>>,
}

impl<'a> Report<'a> {
    /// Wraps an aggregate for rendering.
    pub fn new(
        kind: ReportKind,
        range: DateRange,
        counts: &'a BTreeMap<String, BTreeMap<String, u32>>,
    ) -> Self {
        Self {
            kind,
            range,
            total: total_count(counts),
            counts,
        }
    }

    /// Plain-text rendering: each outer key, then indented counts.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.kind.title(), self.range);

        if self.counts.is_empty() {
            let _ = writeln!(out, "No shifts found.");
            return out;
        }

        for (outer, inner) in self.counts {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", outer);
            for (key, &count) in inner {
                let _ = writeln!(out, "  {}: {}", key, pluralize(count, "shift", None));
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Total: {}", pluralize(self.total, "shift", None));
        out
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Formats `count` with the singular or plural noun.
///
/// The plural defaults to `singular` followed by `s`.
pub fn pluralize(count: impl Into<u64>, singular: &str, plural: Option<&str>) -> String {
    let count = count.into();
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        match plural {
            Some(plural) => format!("{} {}", count, plural),
            None => format!("{} {}s", count, singular),
        }
    }
}
