//! Signal Resolver: which tickets count as evidence for a role
//!
//! A role's signal is an explicit priority-ordered list of sources
//! (service set, project set, keyword patterns). The precedence between
//! them is data on the role, so a broad source that produces systematic
//! false positives can be suppressed in favour of a narrower one without
//! touching code.

mod resolver;

pub use resolver::{Resolution, SignalResolver};

use crate::config::{Precedence, SignalKind, Thresholds};
use crate::ledger::Ticket;
use regex::RegexSet;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Configuration problem found while resolving one role's signal
///
/// Reported once per role; never retried and never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalIssue {
    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("unknown project '{0}'")]
    UnknownProject(String),

    #[error("invalid keyword pattern '{pattern}': {message}")]
    InvalidKeyword { pattern: String, message: String },

    #[error("{0:?} source has no usable values")]
    EmptySource(SignalKind),

    #[error("no resolvable signal source")]
    NoSignal,

    #[error("observable role has no thresholds")]
    MissingThresholds,
}

/// A compiled signal source
#[derive(Debug, Clone)]
pub enum ActiveSource {
    Services(BTreeSet<String>),
    Projects(BTreeSet<String>),
    Keywords { patterns: Vec<String>, set: RegexSet },
}

impl ActiveSource {
    pub fn kind(&self) -> SignalKind {
        match self {
            ActiveSource::Services(_) => SignalKind::Services,
            ActiveSource::Projects(_) => SignalKind::Projects,
            ActiveSource::Keywords { .. } => SignalKind::Keywords,
        }
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            ActiveSource::Services(names) => ticket
                .service
                .as_deref()
                .is_some_and(|s| names.contains(s)),
            ActiveSource::Projects(keys) => ticket
                .project
                .as_deref()
                .is_some_and(|p| keys.contains(p)),
            ActiveSource::Keywords { set, .. } => {
                set.is_match(&ticket.summary) || set.is_match(&ticket.description)
            }
        }
    }
}

/// Executable signal of one observable role
#[derive(Debug, Clone)]
pub struct RoleSignal {
    active: Vec<ActiveSource>,
    suppressed: Vec<SignalKind>,
    precedence: Precedence,
    thresholds: Thresholds,
}

impl RoleSignal {
    pub fn new(
        active: Vec<ActiveSource>,
        suppressed: Vec<SignalKind>,
        precedence: Precedence,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            active,
            suppressed,
            precedence,
            thresholds,
        }
    }

    /// Whether `ticket` counts toward the role (OR over active sources)
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.active.iter().any(|source| source.matches(ticket))
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn active(&self) -> &[ActiveSource] {
        &self.active
    }

    pub fn summary(&self) -> SignalSummary {
        SignalSummary {
            precedence: self.precedence,
            active: self.active.iter().map(ActiveSource::kind).collect(),
            suppressed: self.suppressed.clone(),
        }
    }
}

/// Report view of a role signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSummary {
    pub precedence: Precedence,
    pub active: Vec<SignalKind>,
    pub suppressed: Vec<SignalKind>,
}

/// Why a role produces no ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonObservableReason {
    /// Curated as strategic/administrative without a ticket footprint
    Curated,
    /// Signal could not be resolved to any service, project or keyword
    Unresolvable(Vec<SignalIssue>),
}

impl NonObservableReason {
    pub fn describe(&self) -> String {
        match self {
            NonObservableReason::Curated => "no ticket footprint".to_string(),
            NonObservableReason::Unresolvable(issues) => {
                let parts: Vec<String> = issues.iter().map(ToString::to_string).collect();
                format!("signal not resolvable: {}", parts.join("; "))
            }
        }
    }
}

/// Observability decision for one role
#[derive(Debug, Clone)]
pub enum ResolvedRole {
    Observable(RoleSignal),
    NonObservable { reason: NonObservableReason },
}

impl ResolvedRole {
    pub fn signal(&self) -> Option<&RoleSignal> {
        match self {
            ResolvedRole::Observable(signal) => Some(signal),
            ResolvedRole::NonObservable { .. } => None,
        }
    }

    pub fn is_observable(&self) -> bool {
        matches!(self, ResolvedRole::Observable(_))
    }
}

#[cfg(test)]
mod tests;
