// Carrier ranking per role
//
// Per person: all tickets vs. tickets matching the role signal. Coverage
// rewards specialists, the capped volume term keeps one-ticket wonders
// from outranking people who actually did the work.

use super::ExclusionList;
use crate::config::{RoleDefinition, Settings};
use crate::ledger::{top_counts, NameCount, StaffMember, TicketLedger};
use crate::signal::{ResolvedRole, RoleSignal, SignalSummary};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Ticket activity of one person with respect to one role
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonActivity {
    pub person: String,
    /// All tickets assigned to the person
    pub total_tickets: usize,
    /// Subset matching the role signal
    pub role_tickets: usize,
    /// Role tickets per service
    pub services: BTreeMap<String, usize>,
    /// Role tickets per project
    pub projects: BTreeMap<String, usize>,
}

impl PersonActivity {
    /// `role_tickets / total_tickets`; `None` when the person has no tickets
    pub fn coverage(&self) -> Option<f64> {
        (self.total_tickets > 0).then(|| self.role_tickets as f64 / self.total_tickets as f64)
    }
}

/// One ranked historic carrier of a role
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub person: String,
    pub total_tickets: usize,
    pub role_tickets: usize,
    /// Unrounded fraction in [0, 1]
    pub coverage: f64,
    /// Percentage rounded to one decimal, display only
    pub coverage_pct: f64,
    pub score: f64,
    /// Person currently holds the role formally
    pub is_current: bool,
    pub top_services: Vec<NameCount>,
    pub top_projects: Vec<NameCount>,
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1}% ({} of {} tickets, score {:.1}){}",
            self.person,
            self.coverage_pct,
            self.role_tickets,
            self.total_tickets,
            self.score,
            if self.is_current { " [current]" } else { "" }
        )
    }
}

/// Attribution output for one role
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReport {
    pub id: String,
    pub role: String,
    pub unit: String,
    pub observable: bool,
    pub description: String,
    pub current_occupants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_observable_reason: Option<String>,
    pub historic_carriers: Vec<Carrier>,
}

/// Ranks historic carriers over one immutable ledger
///
/// Person totals are computed once and shared by every role.
#[derive(Debug)]
pub struct AttributionEngine<'a> {
    ledger: &'a TicketLedger,
    exclusions: &'a ExclusionList,
    staff: &'a [StaffMember],
    settings: &'a Settings,
    totals: BTreeMap<&'a str, usize>,
}

impl<'a> AttributionEngine<'a> {
    pub fn new(
        ledger: &'a TicketLedger,
        exclusions: &'a ExclusionList,
        staff: &'a [StaffMember],
        settings: &'a Settings,
    ) -> Self {
        let mut totals: BTreeMap<&'a str, usize> = BTreeMap::new();
        let mut excluded = 0usize;
        for ticket in ledger.tickets() {
            let Some(person) = ticket.assignee.as_deref() else {
                continue;
            };
            if exclusions.is_excluded(person) {
                excluded += 1;
                continue;
            }
            *totals.entry(person).or_default() += 1;
        }

        debug!(
            people = totals.len(),
            excluded_tickets = excluded,
            "Computed person totals"
        );

        Self {
            ledger,
            exclusions,
            staff,
            settings,
            totals,
        }
    }

    /// Number of people eligible for attribution
    pub fn people(&self) -> usize {
        self.totals.len()
    }

    /// Per-person activity for one role signal, ordered by person
    pub fn activity(&self, signal: &RoleSignal) -> Vec<PersonActivity> {
        let mut by_person: BTreeMap<&str, PersonActivity> = self
            .totals
            .iter()
            .map(|(person, total)| {
                (
                    *person,
                    PersonActivity {
                        person: person.to_string(),
                        total_tickets: *total,
                        ..PersonActivity::default()
                    },
                )
            })
            .collect();

        for ticket in self.ledger.tickets() {
            let Some(person) = ticket.assignee.as_deref() else {
                continue;
            };
            // Excluded accounts have no totals entry
            let Some(activity) = by_person.get_mut(person) else {
                continue;
            };
            if !signal.matches(ticket) {
                continue;
            }
            activity.role_tickets += 1;
            if let Some(service) = &ticket.service {
                *activity.services.entry(service.clone()).or_default() += 1;
            }
            if let Some(project) = &ticket.project {
                *activity.projects.entry(project.clone()).or_default() += 1;
            }
        }

        by_person.into_values().collect()
    }

    /// Ranked carriers for one role signal
    ///
    /// # Arguments
    /// * `role` - Role definition, used to look up current occupants
    /// * `signal` - Resolved signal with the role's thresholds
    ///
    /// # Returns
    /// At most `max_carriers` entries, score descending. Ties go to more
    /// role tickets, then to the person name. Empty when nobody clears the
    /// thresholds.
    pub fn rank(&self, role: &RoleDefinition, signal: &RoleSignal) -> Vec<Carrier> {
        let thresholds = signal.thresholds();
        let cap = self.settings.volume_cap;
        let context = self.settings.top_context;

        let mut carriers: Vec<Carrier> = self
            .activity(signal)
            .into_iter()
            .filter_map(|activity| {
                let coverage = activity.coverage()?;
                if !thresholds.admits(coverage, activity.role_tickets) {
                    return None;
                }
                let score = coverage * activity.total_tickets.min(cap) as f64;
                Some(Carrier {
                    is_current: self.holds_role(&activity.person, role),
                    coverage_pct: (coverage * 1000.0).round() / 10.0,
                    top_services: top_counts(&activity.services, context),
                    top_projects: top_counts(&activity.projects, context),
                    person: activity.person,
                    total_tickets: activity.total_tickets,
                    role_tickets: activity.role_tickets,
                    coverage,
                    score,
                })
            })
            .collect();

        carriers.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.role_tickets.cmp(&a.role_tickets))
                .then_with(|| a.person.cmp(&b.person))
        });
        carriers.truncate(self.settings.max_carriers);
        carriers
    }

    /// Full report entry for one role
    pub fn report(&self, role: &RoleDefinition, resolved: &ResolvedRole) -> RoleReport {
        let (signal, reason, carriers) = match resolved {
            ResolvedRole::Observable(signal) => {
                let carriers = self.rank(role, signal);
                debug!(role = %role.id, carriers = carriers.len(), "Ranked role carriers");
                (Some(signal.summary()), None, carriers)
            }
            ResolvedRole::NonObservable { reason } => (None, Some(reason.describe()), Vec::new()),
        };

        RoleReport {
            id: role.id.clone(),
            role: role.name.clone(),
            unit: role.unit.clone(),
            observable: resolved.is_observable(),
            description: role.description.clone(),
            current_occupants: self.current_occupants(role),
            signal,
            non_observable_reason: reason,
            historic_carriers: carriers,
        }
    }

    /// Reports for all roles, ranked in parallel, in configuration order
    pub fn report_all(&self, roles: &[RoleDefinition], resolved: &[ResolvedRole]) -> Vec<RoleReport> {
        let reports: Vec<RoleReport> = roles
            .par_iter()
            .zip(resolved.par_iter())
            .map(|(role, resolved)| self.report(role, resolved))
            .collect();

        info!(
            roles = reports.len(),
            observable = reports.iter().filter(|r| r.observable).count(),
            people = self.people(),
            "Attributed historic roles"
        );
        reports
    }

    fn current_occupants(&self, role: &RoleDefinition) -> Vec<String> {
        let mut names: Vec<String> = self
            .staff
            .iter()
            .filter(|member| member.holds_role(&role.name) || member.holds_role(&role.id))
            .filter(|member| !self.exclusions.is_excluded(&member.name))
            .map(|member| member.name.trim().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn holds_role(&self, person: &str, role: &RoleDefinition) -> bool {
        self.staff.iter().any(|member| {
            member.name.trim().eq_ignore_ascii_case(person.trim())
                && (member.holds_role(&role.name) || member.holds_role(&role.id))
        })
    }
}
