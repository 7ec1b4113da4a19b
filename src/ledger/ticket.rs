use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single work item from the ticket system
///
/// Tickets are created once per import and never mutated afterwards;
/// enrichment produces a new ledger instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket key (e.g., "SD-1042")
    pub id: String,
    /// Person or bot account the ticket was assigned to
    pub assignee: Option<String>,
    /// Matched service from the catalog
    pub service: Option<String>,
    /// Matched customer
    pub customer: Option<String>,
    /// Project key
    pub project: Option<String>,
    /// Ticket type (Incident, Task, ...)
    pub kind: String,
    /// Creation date (local to the source system)
    pub created: NaiveDate,
    pub summary: String,
    pub description: String,
}

impl Ticket {
    /// Calendar month the ticket was created in
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.created)
    }

    /// Free text used for keyword signals and service matching
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            self.summary.clone()
        } else {
            format!("{} {}", self.summary, self.description)
        }
    }
}

/// Calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Months since year 0, used for gap-free month arithmetic
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_index(index: i64) -> Self {
        Self::new(index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse a ticket creation timestamp
///
/// Accepts RFC 3339, the Jira export format (`2023-04-12T10:00:00.000+0200`),
/// offset-less date-times and plain dates. The date is taken in the
/// timestamp's own offset.
pub fn parse_created(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
