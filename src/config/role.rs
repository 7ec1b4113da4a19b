use serde::{Deserialize, Serialize};

/// Kind of ticket evidence a signal source draws on
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Ticket's matched service is in the set
    Services,
    /// Ticket's project key is in the set
    Projects,
    /// Ticket free text matches one of the keyword patterns
    Keywords,
}

/// How multiple signal sources of one role combine
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// Any active source matches (logical OR)
    #[default]
    Union,
    /// Only the first resolvable source in priority order is active;
    /// broader sources after it are suppressed
    MostSpecific,
}

/// One curated signal source, in priority order within its role
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SignalSourceSpec {
    pub kind: SignalKind,
    pub values: Vec<String>,
}

/// Per-role minimum thresholds for carrier candidates
///
/// Ticket volume baselines differ between roles, so both floors are
/// configured per role and never derived from a global constant.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum fraction of a person's tickets that match the role (0.0-1.0)
    pub min_coverage: f64,
    /// Minimum number of matching tickets
    pub min_absolute_tickets: usize,
}

impl Thresholds {
    pub fn admits(&self, coverage: f64, role_tickets: usize) -> bool {
        coverage >= self.min_coverage && role_tickets >= self.min_absolute_tickets
    }
}

fn default_observable() -> bool {
    true
}

/// Curated organizational role
///
/// # Example TOML
/// ```toml
/// [[role]]
/// id = "isms-advisor"
/// name = "ISMS Advisor"
/// unit = "Engineering & Consulting"
/// precedence = "most-specific"
/// thresholds = { min_coverage = 0.001, min_absolute_tickets = 3 }
///
/// [[role.signal]]
/// kind = "keywords"
/// values = ["ISMS", "ISO ?27001"]
///
/// [[role.signal]]
/// kind = "projects"
/// values = ["SEC"]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RoleDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    /// Curator's judgment whether ticket activity can proxy this role
    #[serde(default = "default_observable")]
    pub observable: bool,
    #[serde(default)]
    pub precedence: Precedence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    /// Signal sources in priority order
    #[serde(default, rename = "signal")]
    pub signals: Vec<SignalSourceSpec>,
}
