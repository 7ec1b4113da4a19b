//! Ticket ledger and reference tables
//!
//! All inputs are loaded once up front. Malformed records are skipped and
//! counted so the run statistics can surface them; a document that cannot
//! be read or is not JSON at all aborts the run.

mod counts;
mod encoded_words;
mod reference;
mod ticket;

pub use counts::{top_counts, NameCount};
pub use encoded_words::decode_encoded_words;
pub use reference::{RevenueRecord, StaffMember};
pub use ticket::{parse_created, Ticket, YearMonth};

use crate::error::{AnalyticsError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts of records read and skipped while loading one input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub records_read: usize,
    pub records_skipped: usize,
}

/// Immutable set of tickets for one refresh cycle
#[derive(Debug, Clone, Default)]
pub struct TicketLedger {
    tickets: Vec<Ticket>,
    stats: LoadStats,
    digest: String,
}

/// Raw ticket as it appears in exports; validated into [`Ticket`]
///
/// Exports disagree on field names (`key` vs `id`, `type` vs `issuetype`,
/// `created` vs `timestamp`), so each alternative is read separately and
/// the first present one wins.
#[derive(Debug, Deserialize)]
struct RawTicket {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    project: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    issuetype: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RawTicket {
    fn validate(self) -> Option<Ticket> {
        let id = non_empty(self.key).or_else(|| match self.id {
            Some(Value::String(s)) => non_empty(Some(s)),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })?;
        let created = parse_created(self.created.or(self.timestamp)?.as_str())?;

        Some(Ticket {
            id,
            assignee: non_empty(self.assignee),
            service: non_empty(self.service),
            customer: non_empty(self.customer),
            project: non_empty(self.project),
            kind: non_empty(self.kind)
                .or_else(|| non_empty(self.issuetype))
                .unwrap_or_else(|| "Unknown".to_string()),
            created,
            summary: decode_encoded_words(self.summary.as_deref().unwrap_or_default().trim()),
            description: self.description.unwrap_or_default().trim().to_string(),
        })
    }
}

impl TicketLedger {
    /// Build a ledger from already validated tickets
    pub fn from_tickets(tickets: Vec<Ticket>) -> Self {
        let stats = LoadStats {
            records_read: tickets.len(),
            records_skipped: 0,
        };
        Self {
            tickets,
            stats,
            digest: String::new(),
        }
    }

    /// Load a ledger from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
        let ledger = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            tickets = ledger.len(),
            skipped = ledger.stats.records_skipped,
            "Loaded ticket ledger"
        );
        Ok(ledger)
    }

    /// Parse a ledger from JSON text
    ///
    /// Accepts a top-level array of tickets, or a project export object of
    /// the form `{"PROJ": {"issues": [...]}}` in which the enclosing key is
    /// the project of each issue.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: Value =
            serde_json::from_str(text).map_err(|e| AnalyticsError::parse("ticket ledger", e))?;

        let records: Vec<Value> = match doc {
            Value::Array(items) => items,
            Value::Object(projects) => {
                let mut records = Vec::new();
                for (project, data) in projects {
                    let issues = match data {
                        Value::Object(mut fields) => match fields.remove("issues") {
                            Some(Value::Array(issues)) => issues,
                            _ => {
                                return Err(AnalyticsError::parse(
                                    "ticket ledger",
                                    format!("project '{}' has no issues array", project),
                                ))
                            }
                        },
                        _ => {
                            return Err(AnalyticsError::parse(
                                "ticket ledger",
                                format!("project '{}' has no issues array", project),
                            ))
                        }
                    };
                    for mut issue in issues {
                        if let Value::Object(fields) = &mut issue {
                            fields.insert("project".to_string(), Value::String(project.clone()));
                        }
                        records.push(issue);
                    }
                }
                records
            }
            _ => {
                return Err(AnalyticsError::parse(
                    "ticket ledger",
                    "expected an array of tickets or a project export object",
                ))
            }
        };

        let mut stats = LoadStats::default();
        let mut tickets = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            stats.records_read += 1;
            match serde_json::from_value::<RawTicket>(record) {
                Ok(raw) => match raw.validate() {
                    Some(ticket) => tickets.push(ticket),
                    None => {
                        debug!(index, "Skipping ticket with empty id or bad timestamp");
                        stats.records_skipped += 1;
                    }
                },
                Err(e) => {
                    debug!(index, error = %e, "Skipping malformed ticket record");
                    stats.records_skipped += 1;
                }
            }
        }

        if stats.records_skipped > 0 {
            warn!(
                skipped = stats.records_skipped,
                read = stats.records_read,
                "Skipped malformed ticket records"
            );
        }

        Ok(Self {
            tickets,
            stats,
            digest: sha256_hex(text.as_bytes()),
        })
    }

    /// Replace the tickets, keeping load statistics and digest
    pub fn with_tickets(&self, tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            stats: self.stats,
            digest: self.digest.clone(),
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// SHA-256 of the raw input text (empty for in-memory ledgers)
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Hex-encoded SHA-256 digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Parse a JSON array of rows, skipping rows that do not deserialize
pub fn parse_rows<T: DeserializeOwned>(text: &str, what: &str) -> Result<(Vec<T>, LoadStats)> {
    let doc: Value = serde_json::from_str(text).map_err(|e| AnalyticsError::parse(what, e))?;
    let Value::Array(items) = doc else {
        return Err(AnalyticsError::parse(what, "expected a JSON array"));
    };

    let mut stats = LoadStats::default();
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        stats.records_read += 1;
        match serde_json::from_value::<T>(item) {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!(what, error = %e, "Skipping malformed row");
                stats.records_skipped += 1;
            }
        }
    }
    if stats.records_skipped > 0 {
        warn!(what, skipped = stats.records_skipped, "Skipped malformed rows");
    }
    Ok((rows, stats))
}

/// Load the revenue ledger
pub fn load_revenue<P: AsRef<Path>>(path: P) -> Result<(Vec<RevenueRecord>, LoadStats)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
    let (rows, stats) = parse_rows::<RevenueRecord>(&text, "revenue ledger")?;
    let rows: Vec<RevenueRecord> = rows
        .into_iter()
        .filter(|r| !r.cost_group.trim().is_empty())
        .collect();
    let dropped = stats.records_read - stats.records_skipped - rows.len();
    Ok((
        rows,
        LoadStats {
            records_read: stats.records_read,
            records_skipped: stats.records_skipped + dropped,
        },
    ))
}

/// Load the staff table
pub fn load_staff<P: AsRef<Path>>(path: P) -> Result<(Vec<StaffMember>, LoadStats)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
    let (rows, stats) = parse_rows::<StaffMember>(&text, "staff table")?;
    let rows: Vec<StaffMember> = rows
        .into_iter()
        .filter(|s| !s.name.trim().is_empty())
        .collect();
    let dropped = stats.records_read - stats.records_skipped - rows.len();
    Ok((
        rows,
        LoadStats {
            records_read: stats.records_read,
            records_skipped: stats.records_skipped + dropped,
        },
    ))
}
